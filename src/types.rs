use std::fmt;

use jiff::SignedDuration;

/// Tag carried by every option that can be configured per source.
pub const TAG_SOURCE: &str = "source";

/// The value kind of an option. Drives both flag binding and coercion in
/// [`Registry::process`](crate::Registry::process).
///
/// `Other` names a kind the flag binder has no dedicated parser for. Such
/// options are bound as string flags and accept any string value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Int,
    Bool,
    Duration,
    String,
    Other(&'static str),
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Int => f.write_str("int"),
            Kind::Bool => f.write_str("bool"),
            Kind::Duration => f.write_str("duration"),
            Kind::String => f.write_str("string"),
            Kind::Other(name) => f.write_str(name),
        }
    }
}

/// A typed option value, used for descriptor defaults and typed read-back.
#[derive(Debug, Clone, PartialEq)]
pub enum OptValue {
    Int(i64),
    Bool(bool),
    Duration(SignedDuration),
    String(String),
}

impl OptValue {
    /// The kind this value naturally belongs to.
    pub fn kind(&self) -> Kind {
        match self {
            OptValue::Int(_) => Kind::Int,
            OptValue::Bool(_) => Kind::Bool,
            OptValue::Duration(_) => Kind::Duration,
            OptValue::String(_) => Kind::String,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            OptValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<SignedDuration> {
        match self {
            OptValue::Duration(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Raw string form, as it would appear in an option value set.
impl fmt::Display for OptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptValue::Int(i) => write!(f, "{i}"),
            OptValue::Bool(b) => write!(f, "{b}"),
            OptValue::Duration(d) => write!(f, "{d}"),
            OptValue::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for OptValue {
    fn from(v: i64) -> Self {
        OptValue::Int(v)
    }
}

impl From<bool> for OptValue {
    fn from(v: bool) -> Self {
        OptValue::Bool(v)
    }
}

impl From<SignedDuration> for OptValue {
    fn from(v: SignedDuration) -> Self {
        OptValue::Duration(v)
    }
}

impl From<&str> for OptValue {
    fn from(v: &str) -> Self {
        OptValue::String(v.to_string())
    }
}

impl From<String> for OptValue {
    fn from(v: String) -> Self {
        OptValue::String(v)
    }
}

/// Identifies the backend a source uses, e.g. `"csv"` or `"postgres"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DriverType(String);

impl DriverType {
    pub fn new(name: impl Into<String>) -> Self {
        DriverType(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DriverType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DriverType {
    fn from(v: &str) -> Self {
        DriverType::new(v)
    }
}
