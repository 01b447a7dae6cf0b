//! In-memory session store.
//!
//! Sessions live for the lifetime of the process and are removed only by
//! [`clear_all`](SessionStore::clear_all). The store owns every mutation:
//! callers get clones and can only change a session by appending an analysis
//! through the store, which keeps the append atomic per session.

use std::collections::HashMap;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::images::ImageRef;

use super::types::{
    Analysis, DEFAULT_DESCRIPTION, DEFAULT_EXAM_TYPE, ExamSession, SessionMetadata, SessionSummary,
};

/// Errors raised by the session store.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Unknown session identifier.
    #[error("session not found: {0}")]
    NotFound(String),
}

/// In-memory mapping of session identifier to session state.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, ExamSession>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create a session for an uploaded reference image.
    ///
    /// Generates a fresh unique identifier and applies metadata defaults.
    pub async fn create(&self, reference_image: ImageRef, metadata: SessionMetadata) -> ExamSession {
        let session = ExamSession {
            session_id: Uuid::new_v4().to_string(),
            reference_image,
            exam_type: metadata
                .exam_type
                .unwrap_or_else(|| DEFAULT_EXAM_TYPE.to_string()),
            description: metadata
                .description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            created_at: chrono::Utc::now(),
            analyses: Vec::new(),
        };

        self.sessions
            .write()
            .await
            .insert(session.session_id.clone(), session.clone());

        info!(session_id = %session.session_id, exam_type = %session.exam_type, "session created");
        session
    }

    /// Get a session by ID.
    pub async fn get(&self, session_id: &str) -> Result<ExamSession, SessionError> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))
    }

    /// Append an analysis to a session and return the updated session.
    ///
    /// The read-modify-write happens under one write lock, so concurrent
    /// appends to the same session cannot lose records.
    pub async fn append_analysis(
        &self,
        session_id: &str,
        analysis: Analysis,
    ) -> Result<ExamSession, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;
        session.analyses.push(analysis);
        Ok(session.clone())
    }

    /// Condensed view of a session.
    pub async fn summary(&self, session_id: &str) -> Result<SessionSummary, SessionError> {
        Ok(self.get(session_id).await?.summary())
    }

    /// Number of active sessions.
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Remove every session. Irreversible.
    pub async fn clear_all(&self) {
        self.sessions.write().await.clear();
        info!("all sessions cleared");
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
