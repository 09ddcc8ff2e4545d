//! The built-in option catalog.
//!
//! Each function returns a fresh descriptor so callers can bind or register
//! it wherever needed. [`register_defaults`] adds the whole catalog to a
//! registry in a fixed order, which is also the order of `--help` output.

use jiff::SignedDuration;

use crate::error::FlagfigError;
use crate::opt::Opt;
use crate::registry::Registry;
use crate::types::Kind;

pub const FORMAT_DATETIME: &str = "format.datetime";
pub const FORMAT_DATETIME_NUMBER: &str = "format.datetime.number";
pub const FORMAT_DATE: &str = "format.date";
pub const FORMAT_DATE_NUMBER: &str = "format.date.number";
pub const FORMAT_TIME: &str = "format.time";
pub const FORMAT_TIME_NUMBER: &str = "format.time.number";
pub const VERBOSE: &str = "verbose";
pub const HEADER: &str = "header";
pub const MONOCHROME: &str = "monochrome";
pub const COMPACT: &str = "compact";
pub const REDACT: &str = "redact";
pub const FLUSH_THRESHOLD: &str = "tuning.flush-threshold";

pub fn format() -> Opt {
    Opt::new("format", Kind::Other("format"))
        .default_value("text")
        .short('f')
        .usage("Output format: text, json, csv, tsv, markdown, html, xml, yaml")
}

pub fn datetime_format() -> Opt {
    Opt::string(FORMAT_DATETIME, "RFC3339")
        .usage("Timestamp format: a named layout such as RFC3339, or a strftime pattern")
}

pub fn datetime_format_as_number() -> Opt {
    Opt::bool(FORMAT_DATETIME_NUMBER, true)
        .usage("Render numeric timestamp layouts (e.g. Unix) as numbers, not strings")
}

pub fn date_format() -> Opt {
    Opt::string(FORMAT_DATE, "DateOnly")
        .usage("Date format: a named layout such as DateOnly, or a strftime pattern")
}

pub fn date_format_as_number() -> Opt {
    Opt::bool(FORMAT_DATE_NUMBER, true)
        .usage("Render numeric date layouts (e.g. %Y) as numbers, not strings")
}

pub fn time_format() -> Opt {
    Opt::string(FORMAT_TIME, "TimeOnly")
        .usage("Time of day format: a named layout such as TimeOnly, or a strftime pattern")
}

pub fn time_format_as_number() -> Opt {
    Opt::bool(FORMAT_TIME_NUMBER, true)
        .usage("Render numeric time layouts (e.g. %H) as numbers, not strings")
}

pub fn verbose() -> Opt {
    Opt::bool(VERBOSE, false)
        .short('v')
        .usage("Print verbose output")
}

pub fn header() -> Opt {
    Opt::bool(HEADER, true).usage("Print header row")
}

pub fn monochrome() -> Opt {
    Opt::bool(MONOCHROME, false)
        .short('M')
        .usage("Don't colorize output")
}

pub fn compact() -> Opt {
    Opt::bool(COMPACT, false)
        .short('c')
        .usage("Compact instead of pretty-printed output")
}

pub fn redact() -> Opt {
    Opt::bool(REDACT, true).usage("Redact passwords in output")
}

pub fn ping_timeout() -> Opt {
    Opt::duration("ping.timeout", SignedDuration::from_secs(10))
        .usage("Ping command timeout")
}

pub fn shell_completion_timeout() -> Opt {
    Opt::duration("shell-completion.timeout", SignedDuration::from_millis(500))
        .usage("Shell completion timeout")
}

pub fn log_enabled() -> Opt {
    Opt::bool("log", false).usage("Enable logging")
}

pub fn log_file() -> Opt {
    Opt::new("log.file", Kind::String).usage("Path to log file; empty disables file logging")
}

pub fn log_level() -> Opt {
    Opt::string("log.level", "warn").usage("Log level: debug, info, warn, error")
}

pub fn conn_max_open() -> Opt {
    Opt::int("conn.max-open", 0)
        .usage("Max open connections to the source; 0 means unlimited")
        .source()
}

pub fn conn_max_idle() -> Opt {
    Opt::int("conn.max-idle", 2)
        .usage("Max connections in the idle pool")
        .source()
}

pub fn conn_max_idle_time() -> Opt {
    Opt::duration("conn.max-idle-time", SignedDuration::from_secs(2))
        .usage("Max time a connection may be idle")
        .source()
}

pub fn conn_max_lifetime() -> Opt {
    Opt::duration("conn.max-lifetime", SignedDuration::from_secs(600))
        .usage("Max time a connection may be reused")
        .source()
}

pub fn retry_max_interval() -> Opt {
    Opt::duration("retry.max-interval", SignedDuration::from_secs(3))
        .usage("Max interval between retries")
        .source()
}

pub fn tuning_errgroup_limit() -> Opt {
    Opt::int("tuning.errgroup-limit", 16).usage("Max concurrent workers per task")
}

pub fn tuning_record_buffer() -> Opt {
    Opt::int("tuning.record-buffer", 1024).usage("Size of the record channel buffer")
}

pub fn tuning_flush_threshold() -> Opt {
    Opt::int(FLUSH_THRESHOLD, 1000).usage("Output writer buffer flush threshold in bytes")
}

pub fn ingest_header() -> Opt {
    Opt::bool("ingest.header", false)
        .usage("Treat the first row of ingested data as a header")
        .source()
}

pub fn ingest_sample_size() -> Opt {
    Opt::int("ingest.sample-size", 256)
        .usage("Rows to sample when detecting column types")
        .source()
}

pub fn csv_delim() -> Opt {
    Opt::string("driver.csv.delim", ",")
        .usage("CSV delimiter")
        .source()
}

pub fn csv_empty_as_null() -> Opt {
    Opt::bool("driver.csv.empty-as-null", true)
        .usage("Treat empty CSV fields as null")
        .source()
}

/// Every built-in option, in registration order.
pub fn all() -> Vec<Opt> {
    vec![
        format(),
        datetime_format(),
        datetime_format_as_number(),
        date_format(),
        date_format_as_number(),
        time_format(),
        time_format_as_number(),
        verbose(),
        header(),
        monochrome(),
        compact(),
        redact(),
        ping_timeout(),
        shell_completion_timeout(),
        log_enabled(),
        log_file(),
        log_level(),
        conn_max_open(),
        conn_max_idle(),
        conn_max_idle_time(),
        conn_max_lifetime(),
        retry_max_interval(),
        tuning_errgroup_limit(),
        tuning_record_buffer(),
        tuning_flush_threshold(),
        ingest_header(),
        ingest_sample_size(),
        csv_delim(),
        csv_empty_as_null(),
    ]
}

/// Register the built-in options with `reg`.
pub fn register_defaults(reg: &mut Registry) -> Result<(), FlagfigError> {
    reg.add(all())
}

/// A registry holding just the built-in options.
pub fn default_registry() -> Result<Registry, FlagfigError> {
    Registry::from_opts(all())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter_for_source;
    use std::collections::HashSet;

    #[test]
    fn catalog_registers_without_duplicates() {
        let reg = default_registry().unwrap();
        assert_eq!(reg.len(), all().len());
    }

    #[test]
    fn registering_twice_fails() {
        let mut reg = default_registry().unwrap();
        assert!(register_defaults(&mut reg).unwrap_err().is_construction());
    }

    #[test]
    fn short_aliases_are_unique() {
        let mut seen = HashSet::new();
        for opt in all() {
            if let Some(c) = opt.short_alias() {
                assert!(seen.insert(c), "duplicate short alias -{c}");
            }
        }
    }

    #[test]
    fn defaults_parse_as_their_kind() {
        let reg = default_registry().unwrap();
        let defaults = reg.defaults();
        assert_eq!(reg.process(&defaults).unwrap().len(), defaults.len());
    }

    #[cfg(feature = "clap")]
    #[test]
    fn whole_catalog_binds_as_flags() {
        let reg = default_registry().unwrap();
        let mut flags = crate::flags::FlagSet::new("sq");
        flags.bind_all(reg.opts()).unwrap();
        let m = flags.try_parse_from(["sq", "-v", "--conn.max-open", "3"]).unwrap();
        let changed = crate::flags::changed_values(&m, &reg);
        assert_eq!(changed.len(), 2);
        assert_eq!(changed.get(VERBOSE), Some("true"));
    }

    #[test]
    fn csv_source_options() {
        let opts = all();
        let keys: Vec<&str> = filter_for_source(&"csv".into(), &opts)
            .into_iter()
            .map(Opt::key)
            .collect();
        assert!(keys.contains(&"driver.csv.delim"));
        assert!(keys.contains(&"conn.max-open"));
        assert!(!keys.contains(&"verbose"));
    }

    #[test]
    fn postgres_source_has_no_csv_options() {
        let opts = all();
        let kept = filter_for_source(&"postgres".into(), &opts);
        assert!(kept.iter().all(|o| !o.key().starts_with("driver.csv.")));
        assert!(kept.iter().any(|o| o.key() == "ingest.header"));
    }
}
