//! Clap adapter: derive command-line flags from option descriptors and read
//! back the values the user explicitly changed.
//!
//! This module is compiled only with the `clap` Cargo feature (on by
//! default). Each [`Opt`] becomes one long flag named after the option key,
//! verbatim (`--ingest.header`, `--driver.csv.delim`), with the descriptor's
//! short alias when it has one.
//!
//! Flag defaults exist so that `--help` can show them and so typed reads of
//! an untouched flag still work, but they never take part in merging:
//! [`changed_values`] only reports flags whose value came from the command
//! line. Otherwise a compiled-in default would silently override a value the
//! user stored in their config or on a source.

use std::collections::{HashMap, HashSet};
use std::ffi::OsString;

use clap::builder::BoolishValueParser;
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use tracing::{debug, warn};

use crate::catalog;
use crate::error::FlagfigError;
use crate::filter;
use crate::opt::{Opt, parse_duration};
use crate::options::Options;
use crate::registry::Registry;
use crate::timefmt;
use crate::types::{DriverType, Kind};

/// Flag names clap adds to every command on its own.
const RESERVED_LONGS: [&str; 1] = ["help"];
const RESERVED_SHORTS: [char; 1] = ['h'];

/// A clap [`Command`] plus the bookkeeping needed to bind option flags
/// safely: which long names and short aliases are taken, and completion
/// candidates attached to bound flags.
#[derive(Debug)]
pub struct FlagSet {
    command: Command,
    longs: HashSet<String>,
    shorts: HashMap<char, String>,
    completions: HashMap<String, Vec<String>>,
}

impl FlagSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_command(Command::new(name.into()))
    }

    /// Wrap an existing command. Flags it already defines count as taken.
    pub fn from_command(command: Command) -> Self {
        let command = command.args_override_self(true);
        let mut longs: HashSet<String> = RESERVED_LONGS.iter().map(|s| s.to_string()).collect();
        let mut shorts: HashMap<char, String> = RESERVED_SHORTS
            .iter()
            .map(|c| (*c, "help".to_string()))
            .collect();
        for arg in command.get_arguments() {
            if let Some(long) = arg.get_long() {
                longs.insert(long.to_string());
            }
            if let Some(short) = arg.get_short() {
                shorts.insert(short, arg.get_id().to_string());
            }
        }
        Self {
            command,
            longs,
            shorts,
            completions: HashMap::new(),
        }
    }

    /// Create the flag for `opt` and return its key.
    ///
    /// A long name or short alias that is already taken in this flag set is
    /// a programming error and returns [`FlagfigError::DuplicateFlag`]. A
    /// default value that does not parse as the option's kind returns
    /// [`FlagfigError::InvalidValue`].
    pub fn bind(&mut self, opt: &Opt) -> Result<String, FlagfigError> {
        let key = opt.key().to_string();
        if self.longs.contains(&key) {
            return Err(FlagfigError::DuplicateFlag {
                flag: format!("--{key}"),
                key,
            });
        }
        if let Some(short) = opt.short_alias()
            && self.shorts.contains_key(&short)
        {
            return Err(FlagfigError::DuplicateFlag {
                flag: format!("-{short}"),
                key,
            });
        }

        let arg = build_arg(opt)?;
        self.command = std::mem::take(&mut self.command).arg(arg);
        self.longs.insert(key.clone());
        if let Some(short) = opt.short_alias() {
            self.shorts.insert(short, key.clone());
        }
        debug!(key = %key, kind = %opt.kind(), "bound option flag");
        Ok(key)
    }

    /// Bind every descriptor in order, returning the keys.
    pub fn bind_all<'a>(
        &mut self,
        opts: impl IntoIterator<Item = &'a Opt>,
    ) -> Result<Vec<String>, FlagfigError> {
        opts.into_iter().map(|opt| self.bind(opt)).collect()
    }

    /// Attach value-completion candidates to a bound flag.
    pub fn complete_with<I, S>(&mut self, key: &str, candidates: I) -> Result<(), FlagfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !self.longs.contains(key) || RESERVED_LONGS.contains(&key) {
            return Err(FlagfigError::UnknownKey(key.to_string()));
        }
        self.completions.insert(
            key.to_string(),
            candidates.into_iter().map(Into::into).collect(),
        );
        Ok(())
    }

    /// Completion candidates for `key`; empty when none were attached.
    pub fn completions(&self, key: &str) -> &[String] {
        self.completions.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn into_command(self) -> Command {
        self.command
    }

    /// Parse `args` (including the binary name) against a copy of the command.
    pub fn try_parse_from<I, T>(&self, args: I) -> Result<ArgMatches, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.command.clone().try_get_matches_from(args)
    }
}

fn build_arg(opt: &Opt) -> Result<Arg, FlagfigError> {
    let key = opt.key().to_string();
    let default = flag_default(opt)?;
    let mut arg = Arg::new(key.clone())
        .long(key)
        .help(opt.usage_text().to_string())
        .action(ArgAction::Set)
        .default_value(default);

    arg = match opt.kind() {
        Kind::Int => arg
            .value_parser(value_parser!(i64))
            .allow_negative_numbers(true),
        Kind::Bool => arg
            .value_parser(BoolishValueParser::new())
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true"),
        Kind::Duration => arg
            .value_parser(parse_duration)
            .allow_hyphen_values(true),
        // Unrecognized kinds are bound as plain strings. A leading hyphen is
        // part of the value, so `--delim -` works.
        Kind::String | Kind::Other(_) => arg.allow_hyphen_values(true),
    };

    if let Some(short) = opt.short_alias() {
        arg = arg.short(short);
    }
    Ok(arg)
}

/// The flag's compiled-in default: the descriptor default when present,
/// otherwise the zero value of the kind (`""` for strings).
fn flag_default(opt: &Opt) -> Result<String, FlagfigError> {
    let default = match (opt.default(), opt.kind()) {
        (Some(value), _) => value.to_string(),
        (None, Kind::Int) => "0".to_string(),
        (None, Kind::Bool) => "false".to_string(),
        (None, Kind::Duration) => "0s".to_string(),
        (None, Kind::String | Kind::Other(_)) => String::new(),
    };
    opt.parse(&default)?;
    Ok(default)
}

/// The options whose flags the user explicitly set on this invocation.
///
/// Options without a bound flag, and flags left at their default, are
/// skipped. The returned values are raw command-line strings; pass them
/// through [`Registry::process`] (or use [`options_from_flags`]) before use.
pub fn changed_values(matches: &ArgMatches, reg: &Registry) -> Options {
    let mut out = Options::new();
    for opt in reg.opts() {
        let key = opt.key();
        let Ok(raw) = matches.try_get_raw(key) else {
            continue;
        };
        if matches.value_source(key) != Some(ValueSource::CommandLine) {
            continue;
        }
        // Every arg a FlagSet binds has a default, so a command-line source
        // always carries at least one raw value. This only trips for
        // matches built from a hand-made Command.
        let Some(value) = raw.and_then(|values| values.last()) else {
            warn!(key, "flag was set but carries no value; check how it was bound");
            continue;
        };
        out.insert(key.to_string(), value.to_string_lossy().into_owned());
    }
    debug!(changed = out.len(), "extracted changed flag values");
    out
}

/// Changed flag values, validated and normalized against `reg`.
pub fn options_from_flags(matches: &ArgMatches, reg: &Registry) -> Result<Options, FlagfigError> {
    reg.process(&changed_values(matches, reg))
        .map_err(|e| e.context("options from flags"))
}

/// Like [`options_from_flags`], restricted to the options applicable to
/// sources of type `driver`.
pub fn src_options_from_flags(
    matches: &ArgMatches,
    reg: &Registry,
    driver: &DriverType,
) -> Result<Options, FlagfigError> {
    let src_reg = filter::src_registry(driver, reg)?;
    options_from_flags(matches, &src_reg)
}

/// Bind the datetime/date/time format flags and their `.number` companions,
/// with layout-name and boolean completions.
pub fn bind_time_format_flags(flags: &mut FlagSet) -> Result<(), FlagfigError> {
    let layouts: Vec<&str> = timefmt::named_layouts().iter().map(|(name, _)| *name).collect();
    for (layout_opt, number_opt) in [
        (catalog::datetime_format(), catalog::datetime_format_as_number()),
        (catalog::date_format(), catalog::date_format_as_number()),
        (catalog::time_format(), catalog::time_format_as_number()),
    ] {
        let key = flags.bind(&layout_opt)?;
        flags.complete_with(&key, layouts.iter().copied())?;
        let key = flags.bind(&number_opt)?;
        flags.complete_with(&key, ["true", "false"])?;
    }
    Ok(())
}
