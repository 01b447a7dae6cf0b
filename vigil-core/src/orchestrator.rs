//! Analysis orchestration.
//!
//! Composes the session store, prompt builder, image store, provider
//! clients, and cost ledger into the per-request pipeline:
//! validate -> dispatch -> provider call -> record. Every collaborator is
//! injected at construction, so each test and each process instance builds
//! its own isolated world.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, error, info};
use uuid::Uuid;

use vigil_models::{
    AnalysisRequest, CallContext, CostLedger, ProviderKind, VisionProvider, pricing,
};

use crate::error::{AnalysisError, Result};
use crate::images::{ImageRef, ImageStore};
use crate::prompt::{PromptContext, build_analysis_prompt};
use crate::session::{Analysis, SessionStore, UNKNOWN_STUDENT};

/// A request to analyze candidate images against a session's reference.
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub session_id: String,
    /// Defaults to the `"unknown"` sentinel when absent.
    pub student_id: Option<String>,
    pub provider: ProviderKind,
    pub model_name: String,
    /// References to already-stored candidate images, at least one.
    pub candidate_images: Vec<ImageRef>,
}

/// Successful orchestration result.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AnalysisOutcome {
    pub analysis: Analysis,
    /// The provider's running grand total after this call.
    pub provider_total_cost: f64,
}

/// Orchestrates one analysis request end to end.
///
/// A provider failure is terminal for its request: the failure is recorded
/// in the ledger with cost 0, the session is left untouched, and the
/// original error is re-surfaced. There are no retries at this layer.
pub struct AnalysisOrchestrator {
    store: Arc<SessionStore>,
    ledger: Arc<CostLedger>,
    images: Arc<dyn ImageStore>,
    providers: HashMap<ProviderKind, Arc<dyn VisionProvider>>,
}

impl AnalysisOrchestrator {
    /// Create an orchestrator with no registered providers.
    pub fn new(
        store: Arc<SessionStore>,
        ledger: Arc<CostLedger>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            store,
            ledger,
            images,
            providers: HashMap::new(),
        }
    }

    /// Register a provider client, keyed by its [`ProviderKind`].
    pub fn with_provider(mut self, provider: Arc<dyn VisionProvider>) -> Self {
        self.providers.insert(provider.kind(), provider);
        self
    }

    /// The session store this orchestrator appends to.
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// The cost ledger this orchestrator records into.
    pub fn ledger(&self) -> &Arc<CostLedger> {
        &self.ledger
    }

    /// Run one analysis request through the full pipeline.
    pub async fn analyze(&self, request: AnalyzeRequest) -> Result<AnalysisOutcome> {
        // Validation happens before any provider call or ledger mutation;
        // a rejected request leaves no trace anywhere.
        if request.candidate_images.is_empty() {
            return Err(AnalysisError::Validation(
                "no candidate images provided".to_string(),
            ));
        }
        let session = self.store.get(&request.session_id).await?;
        let client = self.providers.get(&request.provider).ok_or_else(|| {
            AnalysisError::Validation(format!(
                "no client registered for provider: {}",
                request.provider
            ))
        })?;
        if !pricing::supports_model(request.provider, &request.model_name) {
            return Err(AnalysisError::UnsupportedModel {
                provider: request.provider,
                model: request.model_name.clone(),
            });
        }

        let analysis_id = Uuid::new_v4().to_string();
        let student_id = request
            .student_id
            .clone()
            .unwrap_or_else(|| UNKNOWN_STUDENT.to_string());
        let prompt = build_analysis_prompt(&PromptContext {
            session_id: &session.session_id,
            student_id: &student_id,
            exam_type: &session.exam_type,
            analysis_id: &analysis_id,
        });
        debug!(
            session_id = %session.session_id,
            analysis_id = %analysis_id,
            provider = %request.provider,
            model = %request.model_name,
            "dispatching analysis"
        );

        let reference = self.images.fetch(&session.reference_image).await?;
        let mut candidates = Vec::with_capacity(request.candidate_images.len());
        for image_ref in &request.candidate_images {
            candidates.push(self.images.fetch(image_ref).await?);
        }
        let image_count = candidates.len() as u32;

        let context = CallContext {
            session_id: session.session_id.clone(),
            analysis_id: analysis_id.clone(),
        };

        let started = Instant::now();
        let outcome = client
            .analyze(AnalysisRequest {
                model: &request.model_name,
                prompt: &prompt,
                reference_image: &reference,
                candidate_images: &candidates,
            })
            .await;
        let processing_time_ms = started.elapsed().as_millis() as u64;

        let reply = match outcome {
            Ok(reply) => reply,
            Err(err) => {
                self.ledger.record_failure(
                    request.provider,
                    &request.model_name,
                    image_count,
                    &context,
                    err.to_string(),
                );
                error!(
                    analysis_id = %analysis_id,
                    provider = %request.provider,
                    error = %err,
                    "provider call failed"
                );
                return Err(err.into());
            }
        };

        let cost = self.ledger.record_success(
            request.provider,
            &request.model_name,
            reply.usage,
            image_count,
            &context,
        )?;

        let analysis = Analysis {
            analysis_id,
            timestamp: Utc::now(),
            student_id,
            provider: request.provider,
            model_name: request.model_name.clone(),
            analysis_text: reply.analysis_text,
            cost,
            processing_time_ms,
            image_count,
        };

        self.store
            .append_analysis(&request.session_id, analysis.clone())
            .await?;

        info!(
            analysis_id = %analysis.analysis_id,
            session_id = %request.session_id,
            cost,
            processing_time_ms,
            "analysis completed"
        );

        Ok(AnalysisOutcome {
            analysis,
            provider_total_cost: self.ledger.total_cost(request.provider),
        })
    }
}
