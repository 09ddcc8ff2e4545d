use tracing::debug;

use crate::options::Options;

/// Merge option layers ordered from lowest to highest precedence.
///
/// For every key present in any layer, the value from the last layer that
/// contains it wins. Layers are borrowed and never modified; the result is
/// a fresh set.
pub fn merge<'a>(layers: impl IntoIterator<Item = &'a Options>) -> Options {
    let mut merged = Options::new();
    let mut count = 0usize;
    for layer in layers {
        count += 1;
        for (key, value) in layer.iter() {
            merged.insert(key.to_string(), value.to_string());
        }
    }
    debug!(layers = count, keys = merged.len(), "merged option layers");
    merged
}
