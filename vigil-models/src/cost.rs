//! Per-provider cost tracking and call history.
//!
//! The ledger keeps one append-only history entry per provider invocation
//! attempt and a running total per provider. Both live behind a single lock
//! so a total update and its history append land as one atomic unit; two
//! concurrent successful calls are each reflected exactly once in the total.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::pricing;
use crate::types::{ProviderKind, TokenUsage, round_usd};
use crate::{Error, Result};

/// Identifies the orchestration call a ledger entry belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    /// Session the call ran against.
    pub session_id: String,
    /// Analysis the call produced (or would have produced).
    pub analysis_id: String,
}

/// One record per provider invocation attempt, success or failure.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerEntry {
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
    pub analysis_id: String,
    pub provider: ProviderKind,
    pub model_name: String,
    pub image_count: u32,
    /// Exact token counts when the provider reported them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
    /// Whether the cost was computed from the fixed estimation constants.
    pub estimated: bool,
    pub cost: f64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregated per-model view of the ledger history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelBreakdown {
    pub calls: u64,
    pub total_cost: f64,
    pub total_images: u64,
    pub total_tokens: u64,
    pub avg_cost_per_call: f64,
    pub avg_tokens_per_call: u64,
}

#[derive(Default)]
struct LedgerState {
    totals: HashMap<ProviderKind, f64>,
    history: Vec<LedgerEntry>,
}

/// Tracks monetary cost per provider call and in aggregate.
///
/// Process-lifetime scoped; cleared only by an explicit [`reset`](Self::reset).
pub struct CostLedger {
    state: RwLock<LedgerState>,
}

impl CostLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(LedgerState::default()),
        }
    }

    /// Record a successful provider call and return its cost.
    ///
    /// Cost is derived from the reported token usage, or from the provider's
    /// fixed estimation constants when `usage` is `None`, plus the per-image
    /// rate for `image_count` images, rounded to six decimals. The returned
    /// value is the exact delta added to the provider's running total.
    pub fn record_success(
        &self,
        provider: ProviderKind,
        model: &str,
        usage: Option<TokenUsage>,
        image_count: u32,
        context: &CallContext,
    ) -> Result<f64> {
        let rates = pricing::rates_for(provider, model).ok_or_else(|| Error::UnsupportedModel {
            provider,
            model: model.to_string(),
        })?;

        let (billed, estimated) = match usage {
            Some(reported) => (reported, false),
            None => (pricing::estimated_usage(provider), true),
        };
        let cost = rates.call_cost(billed, image_count);

        let mut state = self.state.write().unwrap();
        *state.totals.entry(provider).or_insert(0.0) += cost;
        state.history.push(LedgerEntry {
            timestamp: Utc::now(),
            session_id: context.session_id.clone(),
            analysis_id: context.analysis_id.clone(),
            provider,
            model_name: model.to_string(),
            image_count,
            usage,
            estimated,
            cost,
            success: true,
            error: None,
        });
        drop(state);

        info!(
            provider = %provider,
            model,
            cost,
            estimated,
            "recorded provider call cost"
        );
        Ok(cost)
    }

    /// Record a failed provider call with cost 0.
    ///
    /// The running total is unchanged; only the history grows.
    pub fn record_failure(
        &self,
        provider: ProviderKind,
        model: &str,
        image_count: u32,
        context: &CallContext,
        error_detail: impl Into<String>,
    ) {
        let detail = error_detail.into();
        let mut state = self.state.write().unwrap();
        state.history.push(LedgerEntry {
            timestamp: Utc::now(),
            session_id: context.session_id.clone(),
            analysis_id: context.analysis_id.clone(),
            provider,
            model_name: model.to_string(),
            image_count,
            usage: None,
            estimated: false,
            cost: 0.0,
            success: false,
            error: Some(detail.clone()),
        });
        drop(state);

        warn!(provider = %provider, model, error = %detail, "recorded failed provider call");
    }

    /// Running total for one provider, six-decimal precision.
    pub fn total_cost(&self, provider: ProviderKind) -> f64 {
        let state = self.state.read().unwrap();
        round_usd(state.totals.get(&provider).copied().unwrap_or(0.0))
    }

    /// Combined total across every provider.
    pub fn combined_total(&self) -> f64 {
        let state = self.state.read().unwrap();
        round_usd(state.totals.values().sum())
    }

    /// Per-model aggregation of the successful calls in history.
    ///
    /// Computed on demand from the history snapshot, so it is always
    /// consistent with it.
    pub fn breakdown(&self, provider: ProviderKind) -> HashMap<String, ModelBreakdown> {
        let state = self.state.read().unwrap();
        let mut breakdown: HashMap<String, ModelBreakdown> = HashMap::new();

        for entry in state.history.iter().filter(|e| e.success && e.provider == provider) {
            let model = breakdown.entry(entry.model_name.clone()).or_insert(ModelBreakdown {
                calls: 0,
                total_cost: 0.0,
                total_images: 0,
                total_tokens: 0,
                avg_cost_per_call: 0.0,
                avg_tokens_per_call: 0,
            });
            model.calls += 1;
            model.total_cost += entry.cost;
            model.total_images += u64::from(entry.image_count);
            model.total_tokens += entry.usage.map(|u| u.total()).unwrap_or(0);
        }

        for model in breakdown.values_mut() {
            model.total_cost = round_usd(model.total_cost);
            model.avg_cost_per_call = round_usd(model.total_cost / model.calls as f64);
            model.avg_tokens_per_call =
                (model.total_tokens as f64 / model.calls as f64).round() as u64;
        }

        breakdown
    }

    /// Snapshot of the full call history, oldest first.
    pub fn history(&self) -> Vec<LedgerEntry> {
        self.state.read().unwrap().history.clone()
    }

    /// Zero every running total and clear history. Irreversible.
    pub fn reset(&self) {
        let mut state = self.state.write().unwrap();
        state.totals.clear();
        state.history.clear();
        drop(state);
        info!("cost ledger reset");
    }
}

impl Default for CostLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> CallContext {
        CallContext {
            session_id: "session-1".to_string(),
            analysis_id: "analysis-1".to_string(),
        }
    }

    // ==================== Success Recording Tests ====================

    #[test]
    fn record_success_with_reported_usage_computes_exact_cost() {
        let ledger = CostLedger::new();

        let cost = ledger
            .record_success(
                ProviderKind::OpenAi,
                "gpt-4o",
                Some(TokenUsage::new(1000, 500)),
                2,
                &ctx(),
            )
            .unwrap();

        // (1000/1000)*0.005 + (500/1000)*0.015 + 2*0.00425
        assert_eq!(cost, 0.021);
        assert_eq!(ledger.total_cost(ProviderKind::OpenAi), 0.021);

        let history = ledger.history();
        assert_eq!(history.len(), 1);
        assert!(history[0].success);
        assert!(!history[0].estimated);
        assert_eq!(history[0].usage, Some(TokenUsage::new(1000, 500)));
    }

    #[test]
    fn record_success_without_usage_falls_back_to_estimates() {
        let ledger = CostLedger::new();

        let cost = ledger
            .record_success(ProviderKind::Gemini, "gemini-1.5-pro", None, 2, &ctx())
            .unwrap();

        // (1500/1000)*0.00125 + (800/1000)*0.005 + 2*0.003125
        assert_eq!(cost, 0.012125);

        let history = ledger.history();
        assert!(history[0].estimated);
        assert!(history[0].usage.is_none());
    }

    #[test]
    fn record_success_rejects_unpriced_model() {
        let ledger = CostLedger::new();

        let result = ledger.record_success(ProviderKind::OpenAi, "not-a-model", None, 1, &ctx());

        assert!(matches!(result, Err(Error::UnsupportedModel { .. })));
        assert!(ledger.history().is_empty());
        assert_eq!(ledger.total_cost(ProviderKind::OpenAi), 0.0);
    }

    #[test]
    fn totals_accumulate_per_provider_independently() {
        let ledger = CostLedger::new();

        ledger
            .record_success(ProviderKind::OpenAi, "gpt-4o", Some(TokenUsage::new(1000, 500)), 1, &ctx())
            .unwrap();
        ledger
            .record_success(ProviderKind::Gemini, "gemini-1.5-flash", None, 1, &ctx())
            .unwrap();

        let openai = ledger.total_cost(ProviderKind::OpenAi);
        let gemini = ledger.total_cost(ProviderKind::Gemini);
        assert!(openai > 0.0);
        assert!(gemini > 0.0);
        assert_eq!(ledger.combined_total(), round_usd(openai + gemini));
    }

    // ==================== Failure Recording Tests ====================

    #[test]
    fn record_failure_appends_entry_without_changing_total() {
        let ledger = CostLedger::new();
        ledger
            .record_success(ProviderKind::OpenAi, "gpt-4o", Some(TokenUsage::new(100, 50)), 1, &ctx())
            .unwrap();
        let before = ledger.total_cost(ProviderKind::OpenAi);

        ledger.record_failure(ProviderKind::OpenAi, "gpt-4o", 1, &ctx(), "rate limited");

        assert_eq!(ledger.total_cost(ProviderKind::OpenAi), before);
        let history = ledger.history();
        assert_eq!(history.len(), 2);
        let failure = &history[1];
        assert!(!failure.success);
        assert_eq!(failure.cost, 0.0);
        assert_eq!(failure.error.as_deref(), Some("rate limited"));
    }

    // ==================== Breakdown Tests ====================

    #[test]
    fn breakdown_aggregates_successful_calls_per_model() {
        let ledger = CostLedger::new();
        ledger
            .record_success(ProviderKind::OpenAi, "gpt-4o", Some(TokenUsage::new(1000, 500)), 2, &ctx())
            .unwrap();
        ledger
            .record_success(ProviderKind::OpenAi, "gpt-4o", Some(TokenUsage::new(500, 250)), 1, &ctx())
            .unwrap();
        ledger
            .record_success(ProviderKind::OpenAi, "gpt-4o-mini", Some(TokenUsage::new(100, 50)), 1, &ctx())
            .unwrap();
        ledger.record_failure(ProviderKind::OpenAi, "gpt-4o", 1, &ctx(), "boom");

        let breakdown = ledger.breakdown(ProviderKind::OpenAi);
        assert_eq!(breakdown.len(), 2);

        let gpt4o = &breakdown["gpt-4o"];
        assert_eq!(gpt4o.calls, 2);
        assert_eq!(gpt4o.total_images, 3);
        assert_eq!(gpt4o.total_tokens, 1500 + 750);
        assert_eq!(gpt4o.avg_tokens_per_call, 1125);
        assert_eq!(gpt4o.avg_cost_per_call, round_usd(gpt4o.total_cost / 2.0));
    }

    #[test]
    fn breakdown_is_scoped_to_requested_provider() {
        let ledger = CostLedger::new();
        ledger
            .record_success(ProviderKind::Gemini, "gemini-2.5-flash", None, 1, &ctx())
            .unwrap();

        assert!(ledger.breakdown(ProviderKind::OpenAi).is_empty());
        assert_eq!(ledger.breakdown(ProviderKind::Gemini).len(), 1);
    }

    #[test]
    fn breakdown_counts_estimated_calls_without_token_totals() {
        let ledger = CostLedger::new();
        ledger
            .record_success(ProviderKind::Gemini, "gemini-1.5-flash", None, 2, &ctx())
            .unwrap();

        let breakdown = ledger.breakdown(ProviderKind::Gemini);
        let flash = &breakdown["gemini-1.5-flash"];
        assert_eq!(flash.calls, 1);
        assert_eq!(flash.total_tokens, 0);
        assert_eq!(flash.avg_tokens_per_call, 0);
    }

    // ==================== Reset Tests ====================

    #[test]
    fn reset_clears_totals_and_history() {
        let ledger = CostLedger::new();
        ledger
            .record_success(ProviderKind::OpenAi, "gpt-4o", Some(TokenUsage::new(100, 100)), 1, &ctx())
            .unwrap();
        ledger.record_failure(ProviderKind::Gemini, "gemini-2.5-pro", 1, &ctx(), "boom");

        ledger.reset();

        assert_eq!(ledger.total_cost(ProviderKind::OpenAi), 0.0);
        assert_eq!(ledger.total_cost(ProviderKind::Gemini), 0.0);
        assert_eq!(ledger.combined_total(), 0.0);
        assert!(ledger.history().is_empty());
        assert!(ledger.breakdown(ProviderKind::OpenAi).is_empty());
    }

    // ==================== Concurrency Tests ====================

    #[test]
    fn concurrent_successes_are_each_reflected_exactly_once() {
        use std::sync::Arc;

        let ledger = Arc::new(CostLedger::new());
        let mut handles = vec![];

        for i in 0..16 {
            let ledger = Arc::clone(&ledger);
            handles.push(std::thread::spawn(move || {
                let context = CallContext {
                    session_id: "session-1".to_string(),
                    analysis_id: format!("analysis-{i}"),
                };
                ledger
                    .record_success(
                        ProviderKind::OpenAi,
                        "gpt-4o-mini",
                        Some(TokenUsage::new(1000, 1000)),
                        1,
                        &context,
                    )
                    .unwrap()
            }));
        }

        let costs: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let expected: f64 = costs.iter().sum();

        assert_eq!(ledger.history().len(), 16);
        assert_eq!(ledger.total_cost(ProviderKind::OpenAi), round_usd(expected));
    }
}
