//! Driver-aware filtering of option descriptors.
//!
//! Only options tagged `source` can be set per source. Of those, an option
//! that is specific to a driver applies only to sources of that driver type.
//! An option is driver-specific when it lists explicit drivers
//! ([`Opt::for_drivers`]) or when its key mentions `driver`. A key
//! namespaced as `driver.<type>.<setting>` applies to `<type>`; any other key
//! mentioning `driver` applies only to a driver named by one of its segments.

use tracing::debug;

use crate::error::FlagfigError;
use crate::opt::Opt;
use crate::registry::Registry;
use crate::types::{DriverType, TAG_SOURCE};

/// The key segment that introduces a driver namespace.
const DRIVER_SEGMENT: &str = "driver";

/// Keep the descriptors that apply to sources of type `driver`, in input order.
pub fn filter_for_source<'a>(
    driver: &DriverType,
    opts: impl IntoIterator<Item = &'a Opt>,
) -> Vec<&'a Opt> {
    opts.into_iter()
        .filter(|opt| applies_to(opt, driver))
        .collect()
}

/// Whether `opt` can be configured on a source of type `driver`.
pub fn applies_to(opt: &Opt, driver: &DriverType) -> bool {
    if !opt.has_tag(TAG_SOURCE) {
        return false;
    }
    if !opt.drivers().is_empty() {
        return opt.drivers().contains(driver);
    }
    let key = opt.key();
    match key_driver(key) {
        Some(typ) => typ == driver.as_str(),
        // Mentions a driver without the `driver.<type>` shape: only offered
        // to a driver named by one of its segments.
        None if key.contains(DRIVER_SEGMENT) => key.split('.').any(|s| s == driver.as_str()),
        None => true,
    }
}

/// The driver type named by a `driver.<type>.<setting>` key, if any.
///
/// Matching is by whole segment, so `driver.tsv.x` never matches a driver
/// named `ts`. Keys like `conn.driverless` have no driver namespace and
/// return `None`.
pub fn key_driver(key: &str) -> Option<&str> {
    let mut segments = key.split('.');
    while let Some(segment) = segments.next() {
        if segment == DRIVER_SEGMENT {
            return segments.next().filter(|s| !s.is_empty());
        }
    }
    None
}

/// A registry containing only the options applicable to `driver`.
pub fn src_registry(driver: &DriverType, reg: &Registry) -> Result<Registry, FlagfigError> {
    let opts: Vec<Opt> = filter_for_source(driver, reg.opts())
        .into_iter()
        .cloned()
        .collect();
    debug!(driver = %driver, kept = opts.len(), total = reg.len(), "filtered options for source");
    Registry::from_opts(opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{ingest_opts, ingest_registry};

    fn keys(opts: &[&Opt]) -> Vec<String> {
        opts.iter().map(|o| o.key().to_string()).collect()
    }

    #[test]
    fn csv_keeps_generic_and_csv_options() {
        let opts = ingest_opts();
        let kept = filter_for_source(&"csv".into(), &opts);
        assert_eq!(keys(&kept), vec!["ingest.header", "driver.csv.delim"]);
    }

    #[test]
    fn xlsx_excludes_csv_options() {
        let opts = ingest_opts();
        let kept = filter_for_source(&"xlsx".into(), &opts);
        assert_eq!(keys(&kept), vec!["ingest.header", "driver.xlsx.sheet"]);
    }

    #[test]
    fn untagged_options_are_excluded() {
        let opts = vec![
            Opt::bool("verbose", false),
            Opt::int("conn.max-open", 10).tag("conn"),
            Opt::int("ingest.sample-size", 256).source(),
        ];
        let kept = filter_for_source(&"csv".into(), &opts);
        assert_eq!(keys(&kept), vec!["ingest.sample-size"]);
    }

    #[test]
    fn driver_name_substring_does_not_match() {
        let opts = vec![Opt::string("driver.tsv.delim", "\t").source()];
        assert!(filter_for_source(&"ts".into(), &opts).is_empty());
        assert!(filter_for_source(&"sv".into(), &opts).is_empty());
        assert_eq!(filter_for_source(&"tsv".into(), &opts).len(), 1);
    }

    #[test]
    fn malformed_driver_keys_are_not_generic() {
        let opts = vec![
            Opt::bool("conn.driverless", false).source(),
            Opt::bool("driver", false).source(),
            Opt::string("ingest.driver", "").source(),
        ];
        assert!(filter_for_source(&"csv".into(), &opts).is_empty());
        assert!(filter_for_source(&"xlsx".into(), &opts).is_empty());
    }

    #[test]
    fn malformed_driver_key_kept_only_for_named_driver() {
        let opts = vec![Opt::string("drivers.csv.x", "").source()];
        assert_eq!(filter_for_source(&"csv".into(), &opts).len(), 1);
        assert!(filter_for_source(&"xlsx".into(), &opts).is_empty());
        assert!(filter_for_source(&"cs".into(), &opts).is_empty());
    }

    #[test]
    fn explicit_drivers_take_precedence_over_key() {
        let opts = vec![
            Opt::int("ingest.sheet-index", 0)
                .source()
                .for_drivers(["xlsx", "ods"]),
        ];
        assert!(filter_for_source(&"csv".into(), &opts).is_empty());
        assert_eq!(filter_for_source(&"ods".into(), &opts).len(), 1);
    }

    #[test]
    fn key_driver_parses_namespace() {
        assert_eq!(key_driver("driver.csv.delim"), Some("csv"));
        assert_eq!(key_driver("ingest.header"), None);
        assert_eq!(key_driver("driver"), None);
        assert_eq!(key_driver("driver..x"), None);
    }

    #[test]
    fn input_is_unmodified() {
        let opts = ingest_opts();
        let before = opts.clone();
        let _ = filter_for_source(&"csv".into(), &opts);
        assert_eq!(opts, before);
    }

    #[test]
    fn src_registry_is_subset_in_order() {
        let reg = ingest_registry();
        let src = src_registry(&"csv".into(), &reg).unwrap();
        let keys: Vec<&str> = src.opts().iter().map(Opt::key).collect();
        assert_eq!(keys, vec!["ingest.header", "driver.csv.delim"]);
        assert_eq!(reg.len(), 3);
    }
}
