//! Configuration loading and validation errors.

use super::error_code::{self, RefmendErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid SQL identifier for {field}: '{value}'")]
    InvalidIdentifier { field: String, value: String },

    #[error("No reference links configured")]
    NoLinks,
}

impl RefmendErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => error_code::IO_ERROR,
            Self::Parse(_) => error_code::CONFIG_PARSE_ERROR,
            Self::InvalidIdentifier { .. } => error_code::INVALID_IDENTIFIER,
            Self::NoLinks => error_code::CONFIG_ERROR,
        }
    }
}
