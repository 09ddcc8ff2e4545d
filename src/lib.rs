//! Typed options, driver-aware CLI flags, and layered option merging for
//! command-line tools that talk to many kinds of data sources.
//!
//! Flagfig keeps one catalog of typed option descriptors and derives
//! everything else from it: the command-line flags, validation of values
//! from config files and environment variables, and the per-source view of
//! which options apply to which driver.
//!
//! ```ignore
//! let mut reg = Registry::new();
//! catalog::register_defaults(&mut reg)?;
//!
//! let mut flags = FlagSet::new("sq");
//! flags.bind_all(reg.opts())?;
//! let matches = flags.try_parse_from(std::env::args_os())?;
//!
//! let config = HostConfig::new(file::load_options(&path, &reg, true)?);
//! apply_source_options(&matches, &reg, &config, &mut src)?;
//! let effective = reg.process(&src.options)?;
//! ```
//!
//! # Option descriptors and the registry
//!
//! An [`Opt`] names one setting: a dotted key (`ingest.header`), a value
//! [`Kind`], an optional default and short alias, usage text, and tags. The
//! [`Registry`] holds descriptors in registration order with a key index.
//! It is built once at startup and then passed around by reference; there
//! is no global registry, so tests can build as many as they like.
//!
//! Registering the same key twice, or binding two flags to the same short
//! alias, is a programming error. Both return a construction error
//! ([`FlagfigError::is_construction`]) meant to stop startup.
//!
//! # Layer precedence
//!
//! ```text
//! Host config defaults    config file, env vars
//!        ↑ overridden by
//! Source-stored values    options saved on the source
//!        ↑ overridden by
//! Changed flags           only flags the user explicitly set
//! ```
//!
//! Every layer is a sparse [`Options`] set of raw strings. [`merge`] takes
//! the layers lowest first and the highest layer containing a key wins.
//! Nothing is coerced until [`Registry::process`] validates the merged set
//! against each descriptor's kind, failing on the first bad key.
//!
//! Flags are special: every bound flag has a compiled-in default, but
//! [`changed_values`] only reports flags whose value came from the command
//! line. A flag default never overrides a value stored in a lower layer.
//!
//! # Driver-specific options
//!
//! Options tagged `source` can be set per source. An option whose key is
//! namespaced as `driver.<type>.<setting>`, or that lists explicit drivers
//! with [`Opt::for_drivers`], applies only to sources of that driver type.
//! [`filter_for_source`] narrows a descriptor list accordingly. Driver
//! names are compared by whole key segment, never by substring.
//!
//! # Presentation
//!
//! [`Printing`] holds the output toggles for one invocation: verbosity,
//! header rows, compact output, redaction, timestamp formatters, and a
//! palette of named color handles. [`Printing::enable_color`] is the only
//! way to switch the handles, and it switches all of them with the
//! monochrome flag, so the two never disagree.
//!
//! # Error handling
//!
//! All fallible operations return [`FlagfigError`]. Validation errors name
//! the offending key and kind; errors raised while resolving flags or a
//! particular source are wrapped with that context.

pub mod catalog;
pub mod error;
pub mod timefmt;
pub mod types;

mod apply;
mod env;
pub mod file;
mod filter;
#[cfg(feature = "clap")]
mod flags;
mod merge;
mod opt;
mod options;
mod printing;
mod registry;

#[cfg(test)]
mod fixtures;

#[cfg(feature = "clap")]
pub use apply::{apply_collection_options, apply_source_options, options_from_cmd};
pub use apply::{HostConfig, Source, apply_layers, process_sources};
pub use env::env_to_options;
pub use error::FlagfigError;
pub use filter::{applies_to, filter_for_source, key_driver, src_registry};
#[cfg(feature = "clap")]
pub use flags::{
    FlagSet, bind_time_format_flags, changed_values, options_from_flags, src_options_from_flags,
};
pub use merge::merge;
pub use opt::{Opt, parse_duration};
pub use options::Options;
pub use printing::{ColorHandle, ColorRole, DEFAULT_FLUSH_THRESHOLD, Palette, Printing};
pub use registry::Registry;
pub use types::{DriverType, Kind, OptValue, TAG_SOURCE};
