//! Session management

pub mod store;
pub mod types;

// Re-export key types for convenience
pub use store::{SessionError, SessionStore};
pub use types::{
    Analysis, AnalysisDigest, DEFAULT_DESCRIPTION, DEFAULT_EXAM_TYPE, ExamSession, SessionMetadata,
    SessionSummary, UNKNOWN_STUDENT,
};
