//! Error types

use thiserror::Error;

/// Errors raised while constructing or inspecting type expressions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// A union was requested over zero members.
    #[error("cannot construct a union of zero members")]
    EmptyUnion,

    /// C3 linearization failed for a class hierarchy.
    #[error("cannot linearize the ancestors of '{class}': inconsistent hierarchy")]
    InconsistentHierarchy { class: String },
}

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML document could not be parsed or did not match the schema.
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// An environment variable held a value that is not a valid setting.
    #[error("environment variable {var}={value:?} is not a valid setting")]
    InvalidEnv { var: String, value: String },

    /// A setting parsed but is out of range.
    #[error("invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    /// Create an out-of-range error
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Result alias for type construction
pub type TypeResult<T> = Result<T, TypeError>;
