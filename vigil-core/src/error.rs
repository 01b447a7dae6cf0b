//! Error types for vigil-core.
//!
//! The taxonomy separates caller-correctable rejections (validation, unknown
//! session, unpriced model) from remote failures: the first three are raised
//! before any provider call or ledger mutation; a provider failure is
//! recorded in the ledger and then re-surfaced with its original detail.

use thiserror::Error;

use vigil_models::ProviderKind;

use crate::images::ImageStoreError;
use crate::session::SessionError;

/// Result alias for orchestration operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors raised while orchestrating an analysis request.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Request rejected before dispatch; nothing was recorded.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unknown session identifier.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// Requested model has no pricing entry for the provider.
    ///
    /// Caller-correctable configuration problem; no network attempt is made.
    #[error("no pricing entry for {provider} model: {model}")]
    UnsupportedModel {
        provider: ProviderKind,
        model: String,
    },

    /// The remote vision call failed or returned a malformed response.
    #[error("provider call failed: {0}")]
    Provider(#[source] vigil_models::Error),

    /// Image bytes could not be fetched through the storage collaborator.
    #[error("image store error: {0}")]
    ImageStore(#[from] ImageStoreError),
}

impl From<vigil_models::Error> for AnalysisError {
    fn from(err: vigil_models::Error) -> Self {
        match err {
            vigil_models::Error::UnsupportedModel { provider, model } => {
                AnalysisError::UnsupportedModel { provider, model }
            }
            other => AnalysisError::Provider(other),
        }
    }
}

impl From<SessionError> for AnalysisError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(id) => AnalysisError::SessionNotFound(id),
        }
    }
}
