//! Core types shared across provider integrations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of supported vision providers.
///
/// Adding a provider means adding a variant here plus one
/// [`VisionProvider`](crate::providers::VisionProvider) implementation;
/// nothing else in the system enumerates providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI chat-completions API.
    OpenAi,
    /// Google Gemini generateContent API.
    Gemini,
}

impl ProviderKind {
    /// All supported providers.
    pub const ALL: [ProviderKind; 2] = [ProviderKind::OpenAi, ProviderKind::Gemini];

    /// Wire/display name of the provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Gemini => "gemini",
        }
    }

    /// Parse a provider from its wire name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "openai" => Some(ProviderKind::OpenAi),
            "gemini" => Some(ProviderKind::Gemini),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Token counts reported by a provider for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt and images.
    pub input_tokens: u64,
    /// Tokens generated in the response.
    pub output_tokens: u64,
}

impl TokenUsage {
    /// Create a new usage record.
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Total tokens across input and output.
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Per-model billing rates in USD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelRates {
    /// Cost per thousand input tokens.
    pub text_input_per_1k: f64,
    /// Cost per thousand output tokens.
    pub text_output_per_1k: f64,
    /// Flat cost per billed image.
    pub image_processing: f64,
}

impl ModelRates {
    /// Create a new rate structure.
    pub const fn new(text_input_per_1k: f64, text_output_per_1k: f64, image_processing: f64) -> Self {
        Self {
            text_input_per_1k,
            text_output_per_1k,
            image_processing,
        }
    }

    /// Cost of one call given token counts and the billed image count,
    /// rounded to six decimal places.
    pub fn call_cost(&self, usage: TokenUsage, image_count: u32) -> f64 {
        let text_input = (usage.input_tokens as f64 / 1000.0) * self.text_input_per_1k;
        let text_output = (usage.output_tokens as f64 / 1000.0) * self.text_output_per_1k;
        let images = image_count as f64 * self.image_processing;
        round_usd(text_input + text_output + images)
    }
}

/// Round a dollar amount to six decimal places.
pub fn round_usd(amount: f64) -> f64 {
    (amount * 1_000_000.0).round() / 1_000_000.0
}

/// A model offered by a provider, together with its rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelListing {
    /// Model name as accepted by the provider API.
    pub name: String,
    /// Provider offering the model.
    pub provider: ProviderKind,
    /// Billing rates for the model.
    pub pricing: ModelRates,
}
