//! # Configuration Loading
//!
//! Reads an [`EngineConfig`] from a TOML file. Every key is optional:
//!
//! ```toml
//! capacity = 4096
//! decay_rate = 0.9
//! attention_threshold = 0.2
//! ```
//!
//! Missing keys take the engine defaults. Unknown keys are rejected.

use crate::error::CliError;
use crate::files::{MAX_CONFIG_FILE_SIZE, read_bounded};
use atomspace_core::EngineConfig;
use std::path::Path;

/// Parse and validate configuration text.
pub fn parse_config(text: &str) -> Result<EngineConfig, CliError> {
    let engine: EngineConfig = toml::from_str(text).map_err(|e| CliError::Config(e.to_string()))?;
    engine.validate()?;
    Ok(engine)
}

/// Load the configuration at `path`, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, CliError> {
    let Some(path) = path else {
        tracing::debug!("no configuration file, using defaults");
        return Ok(EngineConfig::default());
    };

    let text = read_bounded(path, MAX_CONFIG_FILE_SIZE)?;
    let config = parse_config(&text)?;
    tracing::info!(path = %path.display(), capacity = config.capacity, "loaded configuration");
    Ok(config)
}
