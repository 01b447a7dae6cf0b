//! Session and analysis records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vigil_models::{ProviderKind, round_usd};

use crate::images::ImageRef;

/// Exam type applied when the caller supplies none.
pub const DEFAULT_EXAM_TYPE: &str = "general";

/// Session description applied when the caller supplies none.
pub const DEFAULT_DESCRIPTION: &str = "Reference exam environment";

/// Sentinel student identifier when the caller supplies none.
pub const UNKNOWN_STUDENT: &str = "unknown";

/// Caller-supplied metadata for a new session.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionMetadata {
    pub exam_type: Option<String>,
    pub description: Option<String>,
}

/// The result of one provider call against a session's reference image.
///
/// Immutable once appended; `cost` is exactly the delta the cost ledger
/// attributed to this call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub analysis_id: String,
    pub timestamp: DateTime<Utc>,
    pub student_id: String,
    pub provider: ProviderKind,
    pub model_name: String,
    pub analysis_text: String,
    pub cost: f64,
    pub processing_time_ms: u64,
    /// Candidate images submitted; the reference image is not counted here.
    pub image_count: u32,
}

/// A proctoring session anchored by one approved reference image.
///
/// `analyses` is append-only: records are never mutated or removed, and
/// insertion order is chronological completion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamSession {
    pub session_id: String,
    pub reference_image: ImageRef,
    pub exam_type: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub analyses: Vec<Analysis>,
}

impl ExamSession {
    /// Condensed view with summed cost and per-analysis digests.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.session_id.clone(),
            created_at: self.created_at,
            exam_type: self.exam_type.clone(),
            description: self.description.clone(),
            analysis_count: self.analyses.len(),
            total_cost: round_usd(self.analyses.iter().map(|a| a.cost).sum()),
            analyses: self.analyses.iter().map(AnalysisDigest::from).collect(),
        }
    }
}

/// Condensed session view for listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub exam_type: String,
    pub description: String,
    pub analysis_count: usize,
    pub total_cost: f64,
    pub analyses: Vec<AnalysisDigest>,
}

/// Per-analysis digest inside a [`SessionSummary`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisDigest {
    pub analysis_id: String,
    pub timestamp: DateTime<Utc>,
    pub provider: ProviderKind,
    pub model_name: String,
    pub cost: f64,
    pub processing_time_ms: u64,
}

impl From<&Analysis> for AnalysisDigest {
    fn from(analysis: &Analysis) -> Self {
        Self {
            analysis_id: analysis.analysis_id.clone(),
            timestamp: analysis.timestamp,
            provider: analysis.provider,
            model_name: analysis.model_name.clone(),
            cost: analysis.cost,
            processing_time_ms: analysis.processing_time_ms,
        }
    }
}
