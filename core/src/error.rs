//! Error types for the PetFriends client.
//!
//! # Design
//! Service statuses are never errors here: a 403 or 400 from the service is
//! returned as an `ApiResponse` like any other. `ApiError` only covers
//! failures on this side of the wire, and `ConfigError` covers settings
//! loading.

use thiserror::Error;

/// Local failures while building, sending, or decoding a request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("transport failed: {0}")]
    Transport(String),

    /// A photo file could not be read.
    #[error("failed to read photo {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A response body could not be decoded into the requested type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// A response body was plain text where JSON was expected.
    #[error("expected a JSON body, got text: {0}")]
    NotJson(String),
}

/// Failures while loading `Settings`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(String),

    #[error("failed to parse settings: {0}")]
    Parse(String),

    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
