//! The option registry: an ordered, indexed catalog of [`Opt`] descriptors.
//!
//! A registry is populated once at startup and then passed by shared
//! reference to everything that needs it. Registration order is preserved
//! for deterministic iteration (help output, flag binding), and a key index
//! gives constant-time lookup.

use std::collections::HashMap;

use tracing::debug;

use crate::error::FlagfigError;
use crate::opt::Opt;
use crate::options::Options;

#[derive(Debug, Clone, Default)]
pub struct Registry {
    opts: Vec<Opt>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append descriptors in order.
    ///
    /// A key that is already registered is a programming error and returns
    /// [`FlagfigError::DuplicateKey`]. Descriptors before the colliding one
    /// are kept; the rest of the batch is not added.
    pub fn add(&mut self, opts: impl IntoIterator<Item = Opt>) -> Result<(), FlagfigError> {
        for opt in opts {
            if self.index.contains_key(opt.key()) {
                return Err(FlagfigError::DuplicateKey(opt.key().to_string()));
            }
            self.index.insert(opt.key().to_string(), self.opts.len());
            self.opts.push(opt);
        }
        Ok(())
    }

    /// Build a registry from descriptors, failing on the first duplicate key.
    pub fn from_opts(opts: impl IntoIterator<Item = Opt>) -> Result<Self, FlagfigError> {
        let mut reg = Self::new();
        reg.add(opts)?;
        Ok(reg)
    }

    /// Call `f` once per descriptor in registration order. An error from `f`
    /// stops the traversal and is returned.
    pub fn visit<E>(&self, mut f: impl FnMut(&Opt) -> Result<(), E>) -> Result<(), E> {
        for opt in &self.opts {
            f(opt)?;
        }
        Ok(())
    }

    pub fn opts(&self) -> &[Opt] {
        &self.opts
    }

    pub fn get(&self, key: &str) -> Option<&Opt> {
        self.index.get(key).and_then(|&i| self.opts.get(i))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.opts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opts.is_empty()
    }

    /// Validate and normalize a raw option value set.
    ///
    /// Every key must be registered and every value must parse as its
    /// descriptor's kind. Fails fast on the first offending key; on success
    /// returns a new, normalized set.
    pub fn process(&self, options: &Options) -> Result<Options, FlagfigError> {
        let mut out = Options::new();
        for (key, raw) in options.iter() {
            let opt = self
                .get(key)
                .ok_or_else(|| FlagfigError::UnknownKey(key.to_string()))?;
            let normalized = opt.normalize(raw)?;
            out.insert(key.to_string(), normalized);
        }
        debug!(count = out.len(), "processed options");
        Ok(out)
    }

    /// The descriptor defaults as an option value set. Options without a
    /// default are absent.
    pub fn defaults(&self) -> Options {
        self.opts
            .iter()
            .filter_map(|opt| opt.default().map(|d| (opt.key().to_string(), d.to_string())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::ingest_registry;
    use crate::types::Kind;

    #[test]
    fn add_preserves_registration_order() {
        let reg = Registry::from_opts([
            Opt::bool("zeta", false),
            Opt::int("alpha", 1),
            Opt::string("mid", ""),
        ])
        .unwrap();
        let keys: Vec<&str> = reg.opts().iter().map(Opt::key).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn duplicate_key_is_construction_error() {
        let mut reg = Registry::new();
        reg.add([Opt::int("n", 1)]).unwrap();
        let err = reg.add([Opt::int("m", 2), Opt::bool("n", true)]).unwrap_err();
        assert!(matches!(err, FlagfigError::DuplicateKey(ref k) if k == "n"));
        assert!(err.is_construction());
        // The original entry is untouched.
        assert_eq!(reg.get("n").unwrap().kind(), Kind::Int);
        assert!(reg.contains("m"));
    }

    #[test]
    fn get_looks_up_by_key() {
        let reg = ingest_registry();
        assert_eq!(reg.get("driver.csv.delim").unwrap().kind(), Kind::String);
        assert!(reg.get("nope").is_none());
    }

    #[test]
    fn visit_in_order() {
        let reg = ingest_registry();
        let mut seen = Vec::new();
        reg.visit(|opt| {
            seen.push(opt.key().to_string());
            Ok::<(), FlagfigError>(())
        })
        .unwrap();
        assert_eq!(seen, vec!["ingest.header", "driver.csv.delim", "driver.xlsx.sheet"]);
    }

    #[test]
    fn visit_error_aborts() {
        let reg = ingest_registry();
        let mut calls = 0;
        let result = reg.visit(|opt| {
            calls += 1;
            if opt.key() == "driver.csv.delim" {
                return Err("stop");
            }
            Ok(())
        });
        assert_eq!(result, Err("stop"));
        assert_eq!(calls, 2);
    }

    #[test]
    fn process_normalizes_values() {
        let reg = Registry::from_opts([Opt::int("n", 0), Opt::bool("b", false)]).unwrap();
        let raw: Options = [("n", " 42"), ("b", "YES")].into_iter().collect();
        let out = reg.process(&raw).unwrap();
        assert_eq!(out.get("n"), Some("42"));
        assert_eq!(out.get("b"), Some("true"));
        // Input is untouched.
        assert_eq!(raw.get("b"), Some("YES"));
    }

    #[test]
    fn process_rejects_unknown_key() {
        let reg = ingest_registry();
        let raw: Options = [("ingest.typo", "1")].into_iter().collect();
        let err = reg.process(&raw).unwrap_err();
        assert!(matches!(err, FlagfigError::UnknownKey(ref k) if k == "ingest.typo"));
    }

    #[test]
    fn process_rejects_wrong_kind() {
        let reg = ingest_registry();
        let raw: Options = [("ingest.header", "sometimes")].into_iter().collect();
        let err = reg.process(&raw).unwrap_err();
        match err {
            FlagfigError::InvalidValue { key, kind, .. } => {
                assert_eq!(key, "ingest.header");
                assert_eq!(kind, Kind::Bool);
            }
            other => panic!("Expected InvalidValue, got: {other:?}"),
        }
    }

    #[test]
    fn process_fails_on_first_error_in_key_order() {
        let reg = Registry::from_opts([Opt::int("a", 0), Opt::int("b", 0)]).unwrap();
        let raw: Options = [("b", "x"), ("a", "y")].into_iter().collect();
        let err = reg.process(&raw).unwrap_err();
        assert!(matches!(err, FlagfigError::InvalidValue { ref key, .. } if key == "a"));
    }

    #[test]
    fn defaults_skip_options_without_default() {
        let reg = Registry::from_opts([Opt::int("n", 5), Opt::new("log.file", Kind::String)])
            .unwrap();
        let defaults = reg.defaults();
        assert_eq!(defaults.get("n"), Some("5"));
        assert!(!defaults.contains_key("log.file"));
    }
}
