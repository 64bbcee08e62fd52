//! Startup orchestration.
//!
//! # Responsibilities
//! - Read configuration from file (or fall back to defaults)
//! - Apply command-line overrides
//! - Validate the result before anything binds
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Precedence: flags, then file, then defaults

use std::path::Path;

use crate::config::{loader::read_config, validate_config, ConfigError, GateConfig};

/// Values given on the command line that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub upstream_address: Option<String>,
    pub log_level: Option<String>,
}

impl ConfigOverrides {
    fn apply(self, config: &mut GateConfig) {
        if let Some(bind) = self.bind_address {
            config.listener.bind_address = bind;
        }
        if let Some(upstream) = self.upstream_address {
            config.upstream.address = upstream;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
    }
}

/// Produce the validated configuration the server starts with.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<GateConfig, ConfigError> {
    let mut config = match path {
        Some(p) => read_config(p)?,
        None => GateConfig::default(),
    };
    overrides.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
