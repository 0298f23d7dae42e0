//! Error types for Horizon Roster.
//!
//! The list engines themselves are total and never fail. Errors only arise
//! at the edges: loading configuration, parsing theme colours, signing in,
//! and owner-side checks such as duplicate record ids.

use std::path::PathBuf;

use crate::model::RecordId;

/// Result type alias for roster operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parse error.
    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("Failed to serialize config as TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON parse or serialization error.
    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension does not name a known format.
    #[error("Unsupported config format for '{0}' (expected .toml or .json)")]
    UnknownFormat(PathBuf),

    /// A value parsed but is not acceptable.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// The theme colour is not a valid hex colour.
    #[error(transparent)]
    Theme(#[from] ThemeError),
}

impl ConfigError {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a value error.
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors from theme colour handling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThemeError {
    /// The input is not a `#rrggbb` colour.
    #[error("Invalid hex colour '{0}'")]
    InvalidHex(String),
}

/// Errors from sign-in, sign-out and password reset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// A required field was left empty.
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    /// The new password and its confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// The new password is shorter than allowed.
    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    /// The provider rejected the credentials.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The operation needs a signed-in session.
    #[error("Not signed in")]
    NotSignedIn,

    /// The provider failed for another reason.
    #[error("Authentication backend error: {0}")]
    Backend(String),
}

/// Errors that can occur in Horizon Roster.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Theme error.
    #[error(transparent)]
    Theme(#[from] ThemeError),

    /// Authentication error.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A record with the same id is already in the collection.
    #[error("Record '{0}' already exists")]
    DuplicateRecord(RecordId),
}
