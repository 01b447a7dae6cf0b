//! Static pricing tables for supported vision models.
//!
//! Every model the system accepts for analysis has an entry here; a model
//! without one is rejected before any network call. The tables are fixed at
//! compile time and read-only at runtime.

use std::collections::HashMap;

use crate::types::{ModelListing, ModelRates, ProviderKind, TokenUsage, round_usd};

/// OpenAI model rates, USD per 1K tokens and per image.
const OPENAI_RATES: &[(&str, ModelRates)] = &[
    ("gpt-4o", ModelRates::new(0.005, 0.015, 0.00425)),
    ("gpt-4o-mini", ModelRates::new(0.00015, 0.0006, 0.00275)),
    ("gpt-4-turbo", ModelRates::new(0.01, 0.03, 0.00765)),
    ("gpt-4.1", ModelRates::new(0.03, 0.06, 0.0)),
    ("gpt-4.1-mini", ModelRates::new(0.00015, 0.0006, 0.00275)),
    ("gpt-image-1", ModelRates::new(0.00015, 0.0006, 0.00275)),
];

/// Gemini model rates, USD per 1K tokens and per image.
const GEMINI_RATES: &[(&str, ModelRates)] = &[
    ("gemini-1.5-pro", ModelRates::new(0.00125, 0.005, 0.003125)),
    ("gemini-1.5-flash", ModelRates::new(0.000075, 0.0003, 0.000075)),
    ("gemini-2.5-pro", ModelRates::new(0.00125, 0.01, 0.00125)),
    ("gemini-2.5-flash", ModelRates::new(0.0003, 0.0025, 0.0003)),
    ("gemini-2.5-flash-lite-preview", ModelRates::new(0.0001, 0.0004, 0.0001)),
    ("gemini-2.0-flash-001", ModelRates::new(0.0001, 0.0004, 0.0001)),
    ("gemini-2.0-flash-lite-001", ModelRates::new(0.000075, 0.0003, 0.000075)),
];

/// Fixed token-count estimates applied when a provider reports no usage.
///
/// These are deliberate constants, not content-derived estimates: OpenAI
/// calls carry a larger base prompt overhead than Gemini calls.
const OPENAI_ESTIMATED_USAGE: TokenUsage = TokenUsage {
    input_tokens: 1800,
    output_tokens: 800,
};
const GEMINI_ESTIMATED_USAGE: TokenUsage = TokenUsage {
    input_tokens: 1500,
    output_tokens: 800,
};

fn table_for(provider: ProviderKind) -> &'static [(&'static str, ModelRates)] {
    match provider {
        ProviderKind::OpenAi => OPENAI_RATES,
        ProviderKind::Gemini => GEMINI_RATES,
    }
}

/// Look up the rates for a model, if the provider prices it.
pub fn rates_for(provider: ProviderKind, model: &str) -> Option<ModelRates> {
    table_for(provider)
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, rates)| *rates)
}

/// Whether the provider prices the given model.
pub fn supports_model(provider: ProviderKind, model: &str) -> bool {
    rates_for(provider, model).is_some()
}

/// The fixed usage estimate applied when a provider reports no token counts.
pub fn estimated_usage(provider: ProviderKind) -> TokenUsage {
    match provider {
        ProviderKind::OpenAi => OPENAI_ESTIMATED_USAGE,
        ProviderKind::Gemini => GEMINI_ESTIMATED_USAGE,
    }
}

/// List a provider's models together with their rates.
pub fn available_models(provider: ProviderKind) -> Vec<ModelListing> {
    table_for(provider)
        .iter()
        .map(|(name, rates)| ModelListing {
            name: (*name).to_string(),
            provider,
            pricing: *rates,
        })
        .collect()
}

/// All supported models, keyed by provider.
pub fn all_models() -> HashMap<ProviderKind, Vec<ModelListing>> {
    ProviderKind::ALL
        .iter()
        .map(|kind| (*kind, available_models(*kind)))
        .collect()
}

/// Pre-call cost estimate for planning, from the fixed usage constants.
///
/// Returns `None` when the model has no pricing entry.
pub fn estimate_cost(provider: ProviderKind, model: &str, image_count: u32) -> Option<f64> {
    let rates = rates_for(provider, model)?;
    Some(round_usd(rates.call_cost(estimated_usage(provider), image_count)))
}
