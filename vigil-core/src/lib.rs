//! Core orchestration library for vigil.
//!
//! vigil routes proctoring snapshots to interchangeable AI vision providers
//! and tracks the monetary cost of every call. This crate owns the session
//! lifecycle, prompt construction, and the analysis pipeline; the provider
//! clients, pricing tables, and cost ledger live in `vigil-models`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                AnalysisOrchestrator                  │
//! │  validate -> prompt -> provider call -> record       │
//! └───────┬───────────────┬────────────────┬────────────┘
//!         │               │                │
//!         ▼               ▼                ▼
//!   SessionStore     ImageStore     CostLedger + clients
//!   (in-memory)      (collaborator)    (vigil-models)
//! ```
//!
//! HTTP transport, image normalization, and file layout are external
//! collaborators; this crate only orchestrates calls and records results.

pub mod error;
pub mod images;
pub mod orchestrator;
pub mod prompt;
pub mod session;

pub use error::{AnalysisError, Result};
pub use images::{ImageRef, ImageStore, ImageStoreError, MAX_CANDIDATE_IMAGES, MemoryImageStore};
pub use orchestrator::{AnalysisOrchestrator, AnalysisOutcome, AnalyzeRequest};
pub use prompt::{PromptContext, build_analysis_prompt};
pub use session::{
    Analysis, ExamSession, SessionError, SessionMetadata, SessionStore, SessionSummary,
};
