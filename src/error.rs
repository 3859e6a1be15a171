//! Error types for the green scheduler

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A job, region or configuration value failed validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The catalog snapshot had no regions to score
    #[error("No regions available to score")]
    EmptyCatalog,

    /// A history record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration could not be loaded or applied
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// Whether the caller can fix this by resubmitting different input
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    /// Stable category label, used for metrics and API error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ValidationError(_) => "validation",
            Self::EmptyCatalog => "empty_catalog",
            Self::NotFound(_) => "not_found",
            Self::ConfigError(_) => "config",
            Self::IoError(_) => "io",
            Self::SerializationError(_) => "serialization",
            Self::TomlError(_) => "config",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
