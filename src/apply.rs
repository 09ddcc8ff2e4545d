//! Composition of the three precedence layers into effective options.
//!
//! ```text
//! Host config defaults    HostConfig::options (config file, env)
//!        ↑ overridden by
//! Source-stored values    Source::options
//!        ↑ overridden by
//! Changed flags           only flags the user explicitly set
//! ```

#[cfg(feature = "clap")]
use clap::ArgMatches;
use tracing::debug;

use crate::error::FlagfigError;
#[cfg(feature = "clap")]
use crate::flags;
use crate::merge::merge;
use crate::options::Options;
use crate::registry::Registry;
use crate::types::DriverType;

/// A configured data source, as far as option resolution is concerned.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    /// Handle such as `@sakila`.
    pub handle: String,
    pub driver: DriverType,
    pub options: Options,
}

impl Source {
    pub fn new(handle: &str, driver: impl Into<DriverType>) -> Self {
        Self {
            handle: handle.to_string(),
            driver: driver.into(),
            options: Options::new(),
        }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }
}

/// The host tool's persisted configuration: the lowest-precedence layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostConfig {
    pub options: Options,
}

impl HostConfig {
    pub fn new(options: Options) -> Self {
        Self { options }
    }
}

/// Replace `src.options` with config defaults, then the source's own values,
/// then `flag_options`.
pub fn apply_layers(config: &HostConfig, src: &mut Source, flag_options: &Options) {
    let effective = merge([&config.options, &src.options, flag_options]);
    debug!(
        handle = %src.handle,
        driver = %src.driver,
        keys = effective.len(),
        "applied source options"
    );
    src.options = effective;
}

/// Config defaults overlaid with the changed flag values.
#[cfg(feature = "clap")]
pub fn options_from_cmd(
    matches: &ArgMatches,
    reg: &Registry,
    config: &HostConfig,
) -> Result<Options, FlagfigError> {
    let flag_options = flags::options_from_flags(matches, reg)?;
    Ok(merge([&config.options, &flag_options]))
}

/// Resolve the effective options of `src`. Only flags applicable to the
/// source's driver type are considered.
#[cfg(feature = "clap")]
pub fn apply_source_options(
    matches: &ArgMatches,
    reg: &Registry,
    config: &HostConfig,
    src: &mut Source,
) -> Result<(), FlagfigError> {
    let flag_options = flags::src_options_from_flags(matches, reg, &src.driver)
        .map_err(|e| e.context(format!("source {}", src.handle)))?;
    apply_layers(config, src, &flag_options);
    Ok(())
}

/// [`apply_source_options`] for each source. Stops at the first error;
/// sources before it have already been updated.
#[cfg(feature = "clap")]
pub fn apply_collection_options(
    matches: &ArgMatches,
    reg: &Registry,
    config: &HostConfig,
    sources: &mut [Source],
) -> Result<(), FlagfigError> {
    sources
        .iter_mut()
        .try_for_each(|src| apply_source_options(matches, reg, config, src))
}

/// Validate the effective options of every source against `reg`.
pub fn process_sources(reg: &Registry, sources: &[Source]) -> Result<(), FlagfigError> {
    for src in sources {
        reg.process(&src.options)
            .map_err(|e| e.context(format!("source {}", src.handle)))?;
    }
    Ok(())
}
