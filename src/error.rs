use std::path::PathBuf;

use thiserror::Error;

use crate::types::Kind;

#[derive(Debug, Error)]
pub enum FlagfigError {
    #[error("Option '{0}' is already registered")]
    DuplicateKey(String),

    #[error("Flag '{flag}' for option '{key}' is already defined in this flag set")]
    DuplicateFlag { flag: String, key: String },

    #[error("Unknown option '{0}'")]
    UnknownKey(String),

    #[error("Invalid {kind} value for '{key}': {reason}")]
    InvalidValue {
        key: String,
        kind: Kind,
        reason: String,
    },

    #[error("Unknown option '{key}' in {path} (line {line})")]
    UnknownFileKey {
        key: String,
        path: PathBuf,
        line: usize,
    },

    #[error("Unknown options in config file")]
    UnknownKeys(Vec<FlagfigError>),

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<FlagfigError>,
    },
}

impl FlagfigError {
    /// Wrap `self` with a short description of what was being done.
    pub fn context(self, context: impl Into<String>) -> Self {
        FlagfigError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping any `Context` wrappers.
    pub fn root(&self) -> &FlagfigError {
        match self {
            FlagfigError::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// Construction errors signal a programming defect and should halt startup.
    pub fn is_construction(&self) -> bool {
        matches!(
            self.root(),
            FlagfigError::DuplicateKey(_) | FlagfigError::DuplicateFlag { .. }
        )
    }
}
