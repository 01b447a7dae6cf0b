//! Vision provider trait and implementations.
//!
//! The [`VisionProvider`] trait defines the unified interface for all vision
//! providers. Each implementation owns its wire format; callers only see the
//! prompt-plus-images request and the text-plus-usage reply.
//!
//! # Example
//!
//! ```ignore
//! use vigil_models::providers::{AnalysisRequest, VisionProvider};
//!
//! async fn run(provider: &dyn VisionProvider, request: AnalysisRequest<'_>) {
//!     let reply = provider.analyze(request).await?;
//!     println!("{}", reply.analysis_text);
//! }
//! ```

mod gemini;
mod openai;
mod types;

use async_trait::async_trait;

pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
pub use types::{AnalysisRequest, ProviderReply};

use crate::Result;
use crate::types::ProviderKind;

/// Trait for vision-capable model providers.
///
/// One `analyze` call is atomic: the provider either returns one
/// consolidated analysis covering every submitted image, or the call fails
/// as a whole. No retries happen at this layer; a failure surfaces
/// immediately to the caller, which owns the bookkeeping.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Which provider this client talks to.
    fn kind(&self) -> ProviderKind;

    /// Analyze candidate images against the reference image.
    ///
    /// Fails with [`Error::UnsupportedModel`](crate::Error::UnsupportedModel)
    /// before any network I/O when the model has no pricing entry.
    async fn analyze(&self, request: AnalysisRequest<'_>) -> Result<ProviderReply>;
}
