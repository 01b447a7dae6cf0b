//! Error types for provider integrations.

use thiserror::Error;

use crate::types::ProviderKind;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during provider operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Requested model has no pricing entry for this provider.
    ///
    /// Detected before any network call is attempted.
    #[error("unsupported {provider} model: {model}")]
    UnsupportedModel {
        provider: ProviderKind,
        model: String,
    },

    /// Credentials not found for provider.
    #[error("credentials not found for provider: {0}")]
    CredentialsNotFound(ProviderKind),

    /// Provider API error (non-success status or malformed envelope).
    #[error("provider API error: {0}")]
    ProviderApi(String),

    /// Request failed before a response was received.
    #[error("request failed: {0}")]
    Request(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
