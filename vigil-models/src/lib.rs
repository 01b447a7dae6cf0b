//! Provider integrations for vigil.
//!
//! This crate provides:
//! - A unified [`VisionProvider`] trait over external vision model services
//! - OpenAI and Gemini client implementations
//! - Static pricing tables covering every accepted model
//! - A cost ledger tracking per-call and aggregate spend
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  VisionProvider                      │
//! │      ┌──────────────┐      ┌──────────────┐          │
//! │      │ OpenAiClient │      │ GeminiClient │          │
//! │      └──────────────┘      └──────────────┘          │
//! └─────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌─────────────────────────────────────────────────────┐
//! │              Pricing Table + CostLedger              │
//! │        (static rates, totals, call history)          │
//! └─────────────────────────────────────────────────────┘
//! ```

mod error;
mod types;

pub mod auth;
pub mod cost;
pub mod pricing;
pub mod providers;

pub use cost::{CallContext, CostLedger, LedgerEntry, ModelBreakdown};
pub use error::{Error, Result};
pub use providers::{AnalysisRequest, GeminiClient, OpenAiClient, ProviderReply, VisionProvider};
pub use types::{ModelListing, ModelRates, ProviderKind, TokenUsage, round_usd};
