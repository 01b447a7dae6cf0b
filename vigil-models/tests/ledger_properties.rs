//! Property-based tests for cost ledger aggregation invariants.
//!
//! The ledger's running total must always equal the sum of the costs of the
//! success entries in its history, for any sequence of successes and
//! failures across both providers, and a reset must always leave it empty.

use proptest::prelude::*;
use vigil_models::{CallContext, CostLedger, ProviderKind, TokenUsage, round_usd};

/// One recorded call, as generated input.
#[derive(Debug, Clone)]
struct Call {
    provider: ProviderKind,
    model: &'static str,
    usage: Option<TokenUsage>,
    image_count: u32,
    fails: bool,
}

const OPENAI_MODELS: &[&str] = &["gpt-4o", "gpt-4o-mini", "gpt-4-turbo"];
const GEMINI_MODELS: &[&str] = &["gemini-1.5-pro", "gemini-2.5-flash", "gemini-2.0-flash-001"];

fn call_strategy() -> impl Strategy<Value = Call> {
    (
        any::<bool>(),
        0usize..3,
        proptest::option::of((0u64..5_000, 0u64..2_000)),
        0u32..5,
        any::<bool>(),
    )
        .prop_map(|(openai, model_index, usage, image_count, fails)| {
            let (provider, models) = if openai {
                (ProviderKind::OpenAi, OPENAI_MODELS)
            } else {
                (ProviderKind::Gemini, GEMINI_MODELS)
            };
            Call {
                provider,
                model: models[model_index],
                usage: usage.map(|(input, output)| TokenUsage::new(input, output)),
                image_count,
                fails,
            }
        })
}

fn context(index: usize) -> CallContext {
    CallContext {
        session_id: "session-prop".to_string(),
        analysis_id: format!("analysis-{index}"),
    }
}

/// Replay a call sequence against a fresh ledger, returning recorded costs.
fn replay(ledger: &CostLedger, calls: &[Call]) -> Vec<f64> {
    let mut costs = Vec::new();
    for (index, call) in calls.iter().enumerate() {
        if call.fails {
            ledger.record_failure(
                call.provider,
                call.model,
                call.image_count,
                &context(index),
                "synthetic failure",
            );
        } else {
            let cost = ledger
                .record_success(
                    call.provider,
                    call.model,
                    call.usage,
                    call.image_count,
                    &context(index),
                )
                .expect("generated models always have pricing entries");
            costs.push(cost);
        }
    }
    costs
}

proptest! {
    #[test]
    fn total_equals_sum_of_success_costs(calls in prop::collection::vec(call_strategy(), 0..60)) {
        let ledger = CostLedger::new();
        replay(&ledger, &calls);

        for provider in ProviderKind::ALL {
            let expected: f64 = ledger
                .history()
                .iter()
                .filter(|entry| entry.success && entry.provider == provider)
                .map(|entry| entry.cost)
                .sum();
            prop_assert!((ledger.total_cost(provider) - round_usd(expected)).abs() < 1e-9);
        }
    }

    #[test]
    fn failures_never_change_totals(calls in prop::collection::vec(call_strategy(), 0..60)) {
        let successes_only: Vec<Call> = calls.iter().filter(|c| !c.fails).cloned().collect();

        let with_failures = CostLedger::new();
        replay(&with_failures, &calls);

        let without_failures = CostLedger::new();
        replay(&without_failures, &successes_only);

        for provider in ProviderKind::ALL {
            prop_assert_eq!(
                with_failures.total_cost(provider),
                without_failures.total_cost(provider)
            );
        }
    }

    #[test]
    fn every_attempt_lands_in_history_exactly_once(calls in prop::collection::vec(call_strategy(), 0..60)) {
        let ledger = CostLedger::new();
        replay(&ledger, &calls);

        let history = ledger.history();
        prop_assert_eq!(history.len(), calls.len());
        let failures = history.iter().filter(|entry| !entry.success).count();
        prop_assert_eq!(failures, calls.iter().filter(|c| c.fails).count());
        prop_assert!(history.iter().filter(|e| !e.success).all(|e| e.cost == 0.0));
    }

    #[test]
    fn breakdown_call_counts_match_history(calls in prop::collection::vec(call_strategy(), 0..60)) {
        let ledger = CostLedger::new();
        replay(&ledger, &calls);

        for provider in ProviderKind::ALL {
            let breakdown = ledger.breakdown(provider);
            let success_count: u64 = breakdown.values().map(|model| model.calls).sum();
            let expected = ledger
                .history()
                .iter()
                .filter(|entry| entry.success && entry.provider == provider)
                .count() as u64;
            prop_assert_eq!(success_count, expected);
        }
    }

    #[test]
    fn reset_clears_everything(calls in prop::collection::vec(call_strategy(), 0..60)) {
        let ledger = CostLedger::new();
        replay(&ledger, &calls);

        ledger.reset();

        prop_assert_eq!(ledger.combined_total(), 0.0);
        prop_assert!(ledger.history().is_empty());
        for provider in ProviderKind::ALL {
            prop_assert_eq!(ledger.total_cost(provider), 0.0);
            prop_assert!(ledger.breakdown(provider).is_empty());
        }
    }
}
