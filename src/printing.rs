//! Presentation state: output toggles, timestamp formatters, and the color
//! palette.
//!
//! The palette is a fixed set of named [`ColorHandle`]s. Handles can be read
//! and used to paint text, but they can only be switched on or off together
//! through [`Printing::enable_color`], so the monochrome flag and the handles
//! never disagree.

use std::fmt;

use colored::{Color, Colorize};
use jiff::Timestamp;
use tracing::debug;

use crate::catalog;
use crate::error::FlagfigError;
use crate::opt::Opt;
use crate::options::Options;
use crate::timefmt::{self, FormatFn};
use crate::types::{Kind, OptValue};

pub const DEFAULT_FLUSH_THRESHOLD: usize = 1000;

const ROLE_COUNT: usize = 19;

/// One color slot in the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    /// An active handle or group.
    Active,
    Bold,
    Bool,
    Bytes,
    Datetime,
    Duration,
    Error,
    /// The opposite of `Hilite`.
    Faint,
    /// Source handles such as `@sakila`.
    Handle,
    /// Header cells in a table.
    Header,
    Hilite,
    /// Keys such as a JSON field name.
    Key,
    Location,
    Normal,
    Null,
    Number,
    /// Punctuation: colons, braces, commas.
    Punc,
    String,
    Success,
}

impl ColorRole {
    pub const ALL: [ColorRole; ROLE_COUNT] = [
        ColorRole::Active,
        ColorRole::Bold,
        ColorRole::Bool,
        ColorRole::Bytes,
        ColorRole::Datetime,
        ColorRole::Duration,
        ColorRole::Error,
        ColorRole::Faint,
        ColorRole::Handle,
        ColorRole::Header,
        ColorRole::Hilite,
        ColorRole::Key,
        ColorRole::Location,
        ColorRole::Normal,
        ColorRole::Null,
        ColorRole::Number,
        ColorRole::Punc,
        ColorRole::String,
        ColorRole::Success,
    ];
}

/// A foreground color plus text attributes that can be switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorHandle {
    fg: Option<Color>,
    bold: bool,
    dimmed: bool,
    enabled: bool,
}

impl ColorHandle {
    const fn new(fg: Option<Color>) -> Self {
        Self {
            fg,
            bold: false,
            dimmed: false,
            enabled: true,
        }
    }

    const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    const fn dimmed(mut self) -> Self {
        self.dimmed = true;
        self
    }

    pub fn fg(&self) -> Option<Color> {
        self.fg
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Render `text` with this handle's styling, or as-is when disabled.
    pub fn paint(&self, text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        let mut styled = text.normal();
        if let Some(fg) = self.fg {
            styled = styled.color(fg);
        }
        if self.bold {
            styled = styled.bold();
        }
        if self.dimmed {
            styled = styled.dimmed();
        }
        styled.to_string()
    }
}

/// The full set of color handles, one per [`ColorRole`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    handles: [ColorHandle; ROLE_COUNT],
}

impl Palette {
    fn new() -> Self {
        let handles = ColorRole::ALL.map(|role| match role {
            ColorRole::Active => ColorHandle::new(Some(Color::Green)).bold(),
            ColorRole::Bold => ColorHandle::new(None).bold(),
            ColorRole::Bool => ColorHandle::new(Some(Color::Yellow)),
            ColorRole::Bytes => ColorHandle::new(None).dimmed(),
            ColorRole::Datetime => ColorHandle::new(Some(Color::Green)).dimmed(),
            ColorRole::Duration => ColorHandle::new(Some(Color::Green)).dimmed(),
            ColorRole::Error => ColorHandle::new(Some(Color::Red)).bold(),
            ColorRole::Faint => ColorHandle::new(None).dimmed(),
            ColorRole::Handle => ColorHandle::new(Some(Color::Blue)),
            ColorRole::Header => ColorHandle::new(Some(Color::Blue)),
            ColorRole::Hilite => ColorHandle::new(Some(Color::BrightBlue)),
            ColorRole::Key => ColorHandle::new(Some(Color::Blue)).bold(),
            ColorRole::Location => ColorHandle::new(Some(Color::Green)),
            ColorRole::Normal => ColorHandle::new(None),
            ColorRole::Null => ColorHandle::new(None).dimmed(),
            ColorRole::Number => ColorHandle::new(Some(Color::Cyan)),
            ColorRole::Punc => ColorHandle::new(None).bold(),
            ColorRole::String => ColorHandle::new(Some(Color::Green)),
            ColorRole::Success => ColorHandle::new(Some(Color::Green)).bold(),
        });
        Self { handles }
    }

    pub fn get(&self, role: ColorRole) -> &ColorHandle {
        &self.handles[role as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColorRole, &ColorHandle)> {
        ColorRole::ALL.into_iter().zip(self.handles.iter())
    }

    fn set_enabled(&mut self, enabled: bool) {
        for handle in &mut self.handles {
            handle.enabled = enabled;
        }
    }
}

/// Color and pretty-printing options for one command invocation.
#[derive(Clone)]
pub struct Printing {
    /// Controlled by [`enable_color`](Self::enable_color).
    monochrome: bool,
    palette: Palette,

    /// Size in bytes after which an output writer should flush its buffer.
    pub flush_threshold: usize,

    /// Print a header (e.g. a header row) where applicable.
    pub show_header: bool,

    pub verbose: bool,

    /// Don't pretty-print. What that means varies by output format.
    pub compact: bool,

    /// Indent used when pretty-printing.
    pub indent: String,

    /// Mask sensitive fields such as passwords.
    pub redact: bool,

    pub format_datetime: FormatFn,
    /// Render datetimes as bare numbers when the layout allows it.
    pub format_datetime_as_number: bool,

    pub format_date: FormatFn,
    pub format_date_as_number: bool,

    pub format_time: FormatFn,
    pub format_time_as_number: bool,
}

impl Printing {
    /// Color on, header on, verbose and compact off, redaction on.
    pub fn new() -> Self {
        Self {
            monochrome: false,
            palette: Palette::new(),
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
            show_header: true,
            verbose: false,
            compact: false,
            indent: "  ".to_string(),
            redact: true,
            format_datetime: timefmt::format_fn(timefmt::DEFAULT_DATETIME),
            format_datetime_as_number: false,
            format_date: timefmt::format_fn(timefmt::DEFAULT_DATE),
            format_date_as_number: false,
            format_time: timefmt::format_fn(timefmt::DEFAULT_TIME),
            format_time_as_number: false,
        }
    }

    pub fn is_monochrome(&self) -> bool {
        self.monochrome
    }

    /// Enable or disable every color at once.
    pub fn enable_color(&mut self, enable: bool) {
        self.monochrome = !enable;
        self.palette.set_enabled(enable);
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn color(&self, role: ColorRole) -> &ColorHandle {
        self.palette.get(role)
    }

    pub fn paint(&self, role: ColorRole, text: &str) -> String {
        self.palette.get(role).paint(text)
    }

    pub fn datetime(&self, ts: Timestamp) -> String {
        (self.format_datetime)(ts)
    }

    pub fn date(&self, ts: Timestamp) -> String {
        (self.format_date)(ts)
    }

    pub fn time(&self, ts: Timestamp) -> String {
        (self.format_time)(ts)
    }

    /// Configure toggles and formatters from an effective option set.
    /// Keys absent from `options` take the catalog default.
    ///
    /// Every value is validated before any field changes, so on error `self`
    /// is left as it was.
    pub fn apply_options(&mut self, options: &Options) -> Result<(), FlagfigError> {
        let monochrome = read_bool(catalog::monochrome(), options)?;
        let verbose = read_bool(catalog::verbose(), options)?;
        let show_header = read_bool(catalog::header(), options)?;
        let compact = read_bool(catalog::compact(), options)?;
        let redact = read_bool(catalog::redact(), options)?;

        let threshold_opt = catalog::tuning_flush_threshold();
        let threshold = read_int(&threshold_opt, options)?;
        let flush_threshold =
            usize::try_from(threshold).map_err(|_| FlagfigError::InvalidValue {
                key: threshold_opt.key().to_string(),
                kind: Kind::Int,
                reason: format!("{threshold} is negative"),
            })?;

        let (datetime_layout, datetime_as_number) = read_time_format(
            catalog::datetime_format(),
            catalog::datetime_format_as_number(),
            options,
        )?;
        let (date_layout, date_as_number) = read_time_format(
            catalog::date_format(),
            catalog::date_format_as_number(),
            options,
        )?;
        let (time_layout, time_as_number) = read_time_format(
            catalog::time_format(),
            catalog::time_format_as_number(),
            options,
        )?;

        self.enable_color(!monochrome);
        self.verbose = verbose;
        self.show_header = show_header;
        self.compact = compact;
        self.redact = redact;
        self.flush_threshold = flush_threshold;
        self.format_datetime = timefmt::format_fn(&datetime_layout);
        self.format_datetime_as_number = datetime_as_number;
        self.format_date = timefmt::format_fn(&date_layout);
        self.format_date_as_number = date_as_number;
        self.format_time = timefmt::format_fn(&time_layout);
        self.format_time_as_number = time_as_number;

        debug!(
            monochrome = self.monochrome,
            verbose = self.verbose,
            header = self.show_header,
            compact = self.compact,
            redact = self.redact,
            flush_threshold = self.flush_threshold,
            "configured printing"
        );
        Ok(())
    }
}

impl Default for Printing {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Printing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Printing")
            .field("monochrome", &self.monochrome)
            .field("verbose", &self.verbose)
            .field("show_header", &self.show_header)
            .field("compact", &self.compact)
            .field("redact", &self.redact)
            .field("flush_threshold", &self.flush_threshold)
            .field("indent", &self.indent)
            .field("format_datetime_as_number", &self.format_datetime_as_number)
            .field("format_date_as_number", &self.format_date_as_number)
            .field("format_time_as_number", &self.format_time_as_number)
            .finish_non_exhaustive()
    }
}

fn read_bool(opt: Opt, options: &Options) -> Result<bool, FlagfigError> {
    Ok(opt.get(options)?.and_then(|v| v.as_bool()).unwrap_or(false))
}

fn read_int(opt: &Opt, options: &Options) -> Result<i64, FlagfigError> {
    Ok(opt.get(options)?.and_then(|v| v.as_int()).unwrap_or(0))
}

/// A layout and whether it renders as a number. The number flag only
/// counts when the layout is numeric.
fn read_time_format(
    layout_opt: Opt,
    number_opt: Opt,
    options: &Options,
) -> Result<(String, bool), FlagfigError> {
    let layout = read_string(layout_opt, options)?;
    let as_number = read_bool(number_opt, options)? && timefmt::is_numeric(&layout);
    Ok((layout, as_number))
}

fn read_string(opt: Opt, options: &Options) -> Result<String, FlagfigError> {
    Ok(match opt.get(options)? {
        Some(OptValue::String(s)) => s,
        Some(other) => other.to_string(),
        None => String::new(),
    })
}
