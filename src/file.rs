//! The persisted option layer: TOML config files.
//!
//! A config file is read as a TOML table and flattened into dotted keys, so
//! these two documents produce the same layer:
//!
//! ```toml
//! [driver.csv]
//! delim = ";"
//! ```
//!
//! ```toml
//! "driver.csv.delim" = ";"
//! ```
//!
//! Scalars are stored in their raw string form. Typed coercion happens later,
//! once all layers are merged, in [`Registry::process`].
//!
//! A missing file is an empty layer. In strict mode, keys that are not
//! registered are reported with the file path and a best-effort line number;
//! otherwise they are dropped.

use std::path::{Path, PathBuf};

use toml::{Table, Value};
use tracing::debug;

use crate::error::FlagfigError;
use crate::options::Options;
use crate::registry::Registry;
use crate::types::Kind;

/// The platform config file for `app_name`, e.g.
/// `~/.config/{app_name}/{app_name}.toml` on Linux.
///
/// Returns `None` if no home directory can be determined.
pub fn platform_config_path(app_name: &str) -> Option<PathBuf> {
    let proj = directories::ProjectDirs::from("", "", app_name)?;
    Some(proj.config_dir().join(format!("{app_name}.toml")))
}

/// Parse TOML `content` into a flat option layer.
pub fn options_from_toml(content: &str, path: &Path) -> Result<Options, FlagfigError> {
    let table: Table = toml::from_str(content).map_err(|e| FlagfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut options = Options::new();
    flatten_table(&table, "", &mut options)?;
    Ok(options)
}

fn flatten_table(table: &Table, prefix: &str, out: &mut Options) -> Result<(), FlagfigError> {
    for (key, value) in table {
        let dotted = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        let raw = match value {
            Value::Table(sub) => {
                flatten_table(sub, &dotted, out)?;
                continue;
            }
            Value::String(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Datetime(d) => d.to_string(),
            Value::Array(_) => {
                return Err(FlagfigError::InvalidValue {
                    key: dotted,
                    kind: Kind::String,
                    reason: "arrays are not supported as option values".into(),
                });
            }
        };
        out.insert(dotted, raw);
    }
    Ok(())
}

/// Check that every key in `content` is registered in `reg`.
pub fn validate_file_keys(content: &str, path: &Path, reg: &Registry) -> Result<(), FlagfigError> {
    let options = options_from_toml(content, path)?;
    let errors: Vec<FlagfigError> = options
        .keys()
        .filter(|key| !reg.contains(key))
        .map(|key| FlagfigError::UnknownFileKey {
            key: key.to_string(),
            path: path.to_path_buf(),
            line: find_key_line(content, key),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(FlagfigError::UnknownKeys(errors))
    }
}

/// Read the option layer stored at `path`.
///
/// A missing file yields an empty layer. With `strict`, unknown keys are an
/// error; without it they are dropped.
pub fn load_options(path: &Path, reg: &Registry, strict: bool) -> Result<Options, FlagfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found");
            return Ok(Options::new());
        }
        Err(e) => {
            return Err(FlagfigError::IoError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    if strict {
        validate_file_keys(&content, path, reg)?;
    }
    let options = options_from_toml(&content, path)?;
    let options = options.retain_keys(|key| reg.contains(key));
    debug!(path = %path.display(), keys = options.len(), "loaded config file");
    Ok(options)
}

/// Find the 1-indexed line number for a dotted key in TOML content.
///
/// Tracks the current `[section]` header while scanning and matches the leaf
/// key only inside the right section. A quoted dotted key at the top level
/// (`"a.b" = 1`) is matched as a whole.
///
/// This is a best-effort heuristic: inline tables and dotted bare keys are
/// not handled. Returns 0 if the key cannot be located.
fn find_key_line(content: &str, dotted_key: &str) -> usize {
    let segments: Vec<&str> = dotted_key.split('.').collect();
    let Some((leaf, expected_section)) = segments.split_last() else {
        return 0;
    };
    let quoted = format!("\"{dotted_key}\"");

    let mut current_section: Vec<String> = Vec::new();

    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.starts_with('[') && !trimmed.starts_with("[[") {
            let header = trimmed.trim_start_matches('[').trim_end_matches(']').trim();
            current_section = header.split('.').map(|s| s.trim().to_string()).collect();
            continue;
        }

        if current_section.is_empty()
            && let Some(after_key) = trimmed.strip_prefix(&quoted)
            && after_key.trim_start().starts_with('=')
        {
            return i + 1;
        }

        let in_right_section = expected_section.len() == current_section.len()
            && expected_section
                .iter()
                .zip(&current_section)
                .all(|(a, b)| *a == b);

        if in_right_section
            && let Some(after_key) = trimmed.strip_prefix(leaf)
            && after_key.trim_start().starts_with('=')
        {
            return i + 1;
        }
    }
    0
}
