use crate::options::Options;

/// Build an option layer from environment variables matching `{PREFIX}__*`.
///
/// Double underscore `__` separates key segments, which are joined with `.`.
/// Segments are lowercased and a single `_` becomes `-`, so
/// `SQ__CONN__MAX_OPEN` maps to `conn.max-open`.
///
/// Values are kept raw; [`Registry::process`](crate::Registry::process)
/// coerces them like any other layer.
///
/// Takes an iterator so tests can pass synthetic data instead of `std::env::vars()`.
pub fn env_to_options(prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> Options {
    let needle = format!("{prefix}__");
    let mut options = Options::new();

    for (key, value) in vars {
        let Some(rest) = key.strip_prefix(&needle) else {
            continue;
        };
        if rest.is_empty() || rest.split("__").any(str::is_empty) {
            continue;
        }
        options.insert(env_key(rest), value);
    }

    options
}

fn env_key(rest: &str) -> String {
    rest.split("__")
        .map(|segment| segment.to_lowercase().replace('_', "-"))
        .collect::<Vec<_>>()
        .join(".")
}
