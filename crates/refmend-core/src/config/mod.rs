pub mod logging_config;
pub mod repair_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use logging_config::LoggingConfig;
pub use repair_config::RepairConfig;

use crate::errors::ConfigError;

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RefmendConfig {
    pub repair: RepairConfig,
    pub logging: LoggingConfig,
}

impl RefmendConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.repair.validate()
    }
}
