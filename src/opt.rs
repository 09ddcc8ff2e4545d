//! Option descriptors: the typed, immutable definition of one setting.
//!
//! An [`Opt`] is built once (usually in a `static`-like catalog function) and
//! then only read. Builder methods consume `self`, so a descriptor cannot be
//! changed after it has been handed to a [`Registry`](crate::Registry).

use jiff::SignedDuration;

use crate::error::FlagfigError;
use crate::options::Options;
use crate::types::{DriverType, Kind, OptValue, TAG_SOURCE};

/// Literals accepted as boolean values. Mirrors clap's boolish parser so a
/// value accepted on the command line is also accepted from a config file.
const TRUE_LITERALS: [&str; 6] = ["y", "yes", "t", "true", "on", "1"];
const FALSE_LITERALS: [&str; 6] = ["n", "no", "f", "false", "off", "0"];

/// Metadata for one configurable setting.
#[derive(Debug, Clone, PartialEq)]
pub struct Opt {
    key: String,
    kind: Kind,
    tags: Vec<String>,
    short: Option<char>,
    default: Option<OptValue>,
    usage: String,
    drivers: Vec<DriverType>,
}

impl Opt {
    /// A descriptor of the given kind with no default, tags, or alias.
    pub fn new(key: &str, kind: Kind) -> Self {
        Self {
            key: key.to_string(),
            kind,
            tags: Vec::new(),
            short: None,
            default: None,
            usage: String::new(),
            drivers: Vec::new(),
        }
    }

    pub fn int(key: &str, default: i64) -> Self {
        Self::new(key, Kind::Int).default_value(default)
    }

    pub fn bool(key: &str, default: bool) -> Self {
        Self::new(key, Kind::Bool).default_value(default)
    }

    pub fn duration(key: &str, default: SignedDuration) -> Self {
        Self::new(key, Kind::Duration).default_value(default)
    }

    pub fn string(key: &str, default: &str) -> Self {
        Self::new(key, Kind::String).default_value(default)
    }

    pub fn default_value(mut self, value: impl Into<OptValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Register a one-character flag alias.
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        if !self.tags.iter().any(|t| t == tag) {
            self.tags.push(tag.to_string());
        }
        self
    }

    /// Mark the option as configurable per source.
    pub fn source(self) -> Self {
        self.tag(TAG_SOURCE)
    }

    /// Restrict the option to the listed driver types. When empty, driver
    /// applicability falls back to the `driver.<type>.` key convention.
    pub fn for_drivers<I, D>(mut self, drivers: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<DriverType>,
    {
        self.drivers = drivers.into_iter().map(Into::into).collect();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn short_alias(&self) -> Option<char> {
        self.short
    }

    pub fn default(&self) -> Option<&OptValue> {
        self.default.as_ref()
    }

    pub fn usage_text(&self) -> &str {
        &self.usage
    }

    pub fn drivers(&self) -> &[DriverType] {
        &self.drivers
    }

    /// String form of the default, or `""` when there is none.
    pub fn default_string(&self) -> String {
        self.default
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    /// Parse a raw value according to this option's kind.
    pub fn parse(&self, raw: &str) -> Result<OptValue, FlagfigError> {
        let invalid = |reason: String| FlagfigError::InvalidValue {
            key: self.key.clone(),
            kind: self.kind,
            reason,
        };
        match self.kind {
            Kind::Int => raw
                .trim()
                .parse::<i64>()
                .map(OptValue::Int)
                .map_err(|e| invalid(format!("'{raw}': {e}"))),
            Kind::Bool => parse_bool(raw)
                .map(OptValue::Bool)
                .ok_or_else(|| invalid(format!("'{raw}' is not a boolean"))),
            Kind::Duration => parse_duration(raw)
                .map(OptValue::Duration)
                .map_err(invalid),
            Kind::String | Kind::Other(_) => Ok(OptValue::String(raw.to_string())),
        }
    }

    /// Validate `raw` and return its normalized raw form.
    ///
    /// Ints and bools are re-rendered canonically. Durations keep the
    /// literal the user wrote (trimmed). Strings pass through untouched.
    pub fn normalize(&self, raw: &str) -> Result<String, FlagfigError> {
        let value = self.parse(raw)?;
        Ok(match value {
            OptValue::Duration(_) => raw.trim().to_string(),
            OptValue::String(s) => s,
            other => other.to_string(),
        })
    }

    /// The typed value of this option in `options`, falling back to the
    /// descriptor default. `None` when neither is present.
    pub fn get(&self, options: &Options) -> Result<Option<OptValue>, FlagfigError> {
        match options.get(&self.key) {
            Some(raw) => self.parse(raw).map(Some),
            None => Ok(self.default.clone()),
        }
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    let lowered = raw.trim().to_ascii_lowercase();
    if TRUE_LITERALS.contains(&lowered.as_str()) {
        Some(true)
    } else if FALSE_LITERALS.contains(&lowered.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Parse a duration literal such as `30s`, `1m 30s` or `PT30S`.
pub fn parse_duration(raw: &str) -> Result<SignedDuration, String> {
    raw.trim()
        .parse::<SignedDuration>()
        .map_err(|e| format!("'{raw}' is not a duration: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_all_fields() {
        let opt = Opt::int("conn.max-open", 10)
            .short('m')
            .usage("Max open connections")
            .source();
        assert_eq!(opt.key(), "conn.max-open");
        assert_eq!(opt.kind(), Kind::Int);
        assert_eq!(opt.short_alias(), Some('m'));
        assert_eq!(opt.usage_text(), "Max open connections");
        assert!(opt.has_tag(TAG_SOURCE));
        assert_eq!(opt.default(), Some(&OptValue::Int(10)));
    }

    #[test]
    fn tag_is_not_duplicated() {
        let opt = Opt::bool("verbose", false).source().source();
        assert_eq!(opt.tags().len(), 1);
    }

    #[test]
    fn default_string_empty_without_default() {
        let opt = Opt::new("format", Kind::Other("format"));
        assert_eq!(opt.default_string(), "");
        assert_eq!(Opt::int("n", 5).default_string(), "5");
    }

    #[test]
    fn parse_int_rejects_malformed() {
        let opt = Opt::int("n", 0);
        assert_eq!(opt.parse(" 42 ").unwrap(), OptValue::Int(42));
        let err = opt.parse("4x2").unwrap_err();
        assert!(matches!(err, FlagfigError::InvalidValue { ref key, kind: Kind::Int, .. } if key == "n"));
    }

    #[test]
    fn parse_bool_accepts_boolish_literals() {
        let opt = Opt::bool("b", false);
        for raw in ["true", "TRUE", "yes", "1", "on", "t"] {
            assert_eq!(opt.parse(raw).unwrap(), OptValue::Bool(true), "{raw}");
        }
        for raw in ["false", "No", "0", "off", "f"] {
            assert_eq!(opt.parse(raw).unwrap(), OptValue::Bool(false), "{raw}");
        }
        assert!(opt.parse("maybe").is_err());
    }

    #[test]
    fn parse_duration_friendly_and_iso() {
        let opt = Opt::duration("ping.timeout", SignedDuration::from_secs(10));
        assert_eq!(
            opt.parse("30s").unwrap(),
            OptValue::Duration(SignedDuration::from_secs(30))
        );
        assert_eq!(
            opt.parse("PT1M").unwrap(),
            OptValue::Duration(SignedDuration::from_secs(60))
        );
        assert!(opt.parse("soon").is_err());
    }

    #[test]
    fn normalize_canonicalizes_ints_and_bools() {
        assert_eq!(Opt::int("n", 0).normalize("+007").unwrap(), "7");
        assert_eq!(Opt::bool("b", false).normalize("YES").unwrap(), "true");
        assert_eq!(
            Opt::duration("d", SignedDuration::ZERO)
                .normalize(" 30s ")
                .unwrap(),
            "30s"
        );
    }

    #[test]
    fn normalize_keeps_string_whitespace() {
        assert_eq!(Opt::string("driver.csv.delim", ",").normalize("\t").unwrap(), "\t");
    }

    #[test]
    fn other_kind_accepts_any_string() {
        let opt = Opt::new("format", Kind::Other("format"));
        assert_eq!(opt.normalize("json").unwrap(), "json");
    }

    #[test]
    fn get_prefers_value_over_default() {
        let opt = Opt::int("n", 5);
        let empty = Options::new();
        assert_eq!(opt.get(&empty).unwrap(), Some(OptValue::Int(5)));
        let set: Options = [("n", "42")].into_iter().collect();
        assert_eq!(opt.get(&set).unwrap(), Some(OptValue::Int(42)));
    }

    #[test]
    fn get_without_default_is_none() {
        let opt = Opt::new("log.file", Kind::String);
        assert_eq!(opt.get(&Options::new()).unwrap(), None);
    }
}
