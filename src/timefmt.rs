//! Named timestamp layouts and the formatter functions built from them.
//!
//! A layout is either one of the names in [`named_layouts`] or a raw
//! strftime pattern. Formatters always render in UTC.

use std::sync::Arc;

use jiff::Timestamp;
use tracing::debug;

/// A pure function rendering a timestamp as text.
pub type FormatFn = Arc<dyn Fn(Timestamp) -> String + Send + Sync>;

pub const DEFAULT_DATETIME: &str = "RFC3339";
pub const DEFAULT_DATE: &str = "DateOnly";
pub const DEFAULT_TIME: &str = "TimeOnly";

const NAMED_LAYOUTS: &[(&str, &str)] = &[
    ("RFC3339", "%Y-%m-%dT%H:%M:%SZ"),
    ("RFC3339Nano", "%Y-%m-%dT%H:%M:%S%.fZ"),
    ("RFC1123", "%a, %d %b %Y %H:%M:%S UTC"),
    ("ANSIC", "%a %b %d %H:%M:%S %Y"),
    ("DateTime", "%Y-%m-%d %H:%M:%S"),
    ("DateOnly", "%Y-%m-%d"),
    ("TimeOnly", "%H:%M:%S"),
    ("Kitchen", "%I:%M%p"),
    ("Unix", "%s"),
];

/// Directives whose output is all digits.
const NUMERIC_DIRECTIVES: [&str; 9] = ["%s", "%Y", "%y", "%m", "%d", "%j", "%H", "%M", "%S"];

/// All named layouts as `(name, strftime pattern)`, e.g. for flag completion.
pub fn named_layouts() -> &'static [(&'static str, &'static str)] {
    NAMED_LAYOUTS
}

/// The strftime pattern for `layout`: the named layout's pattern, or
/// `layout` itself when it is not a known name.
pub fn pattern(layout: &str) -> &str {
    NAMED_LAYOUTS
        .iter()
        .find(|(name, _)| *name == layout)
        .map(|(_, p)| *p)
        .unwrap_or(layout)
}

/// Whether `layout` renders as a bare number, like `Unix` or `%Y%m%d`.
pub fn is_numeric(layout: &str) -> bool {
    let mut rest = pattern(layout).to_string();
    if rest.is_empty() {
        return false;
    }
    for directive in NUMERIC_DIRECTIVES {
        rest = rest.replace(directive, "");
    }
    rest.is_empty()
}

/// Format `ts` with `layout`. A pattern jiff cannot render falls back to
/// RFC 3339.
pub fn format(layout: &str, ts: Timestamp) -> String {
    match jiff::fmt::strtime::format(pattern(layout), ts) {
        Ok(s) => s,
        Err(err) => {
            debug!(layout, error = %err, "falling back to RFC 3339");
            ts.to_string()
        }
    }
}

/// A formatter bound to `layout`.
pub fn format_fn(layout: &str) -> FormatFn {
    let layout = layout.to_string();
    Arc::new(move |ts| format(&layout, ts))
}
