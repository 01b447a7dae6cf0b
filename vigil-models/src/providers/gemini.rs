//! Gemini vision client.
//!
//! Images travel as provider-native inline base64 parts alongside the prompt
//! text. Token usage is read from `usageMetadata` when the envelope carries
//! it; otherwise the reply has no usage and cost falls back to the fixed
//! estimation policy.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::auth::{ApiKey, api_key_from_env};
use crate::pricing;
use crate::types::{ProviderKind, TokenUsage};
use crate::{Error, Result};

use super::VisionProvider;
use super::types::{AnalysisRequest, ProviderReply};

/// Default Gemini API base URL.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

// ────────────────────────────────────────────────────────────────────────────
// Gemini API Request/Response Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u64>,
    candidates_token_count: Option<u64>,
}

impl UsageMetadata {
    fn to_usage(&self) -> Option<TokenUsage> {
        match (self.prompt_token_count, self.candidates_token_count) {
            (Some(input), Some(output)) => Some(TokenUsage::new(input, output)),
            _ => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// GeminiClient
// ────────────────────────────────────────────────────────────────────────────

/// Client for Gemini vision-capable models.
pub struct GeminiClient {
    base_url: String,
    api_key: ApiKey,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a client against the public Gemini endpoint.
    pub fn new(api_key: impl Into<ApiKey>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL.
    pub fn with_base_url(api_key: impl Into<ApiKey>, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a client with the key from `GEMINI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(api_key_from_env(ProviderKind::Gemini)?))
    }

    /// Get the base URL for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn inline_part(bytes: &[u8]) -> Part {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: "image/jpeg".to_string(),
                data: BASE64_STANDARD.encode(bytes),
            },
        }
    }

    fn build_request(request: &AnalysisRequest<'_>) -> GenerateContentRequest {
        let mut parts = Vec::with_capacity(request.candidate_images.len() + 2);
        parts.push(Part::Text {
            text: request.prompt.to_string(),
        });
        parts.push(Self::inline_part(request.reference_image));
        for image in request.candidate_images {
            parts.push(Self::inline_part(image));
        }

        GenerateContentRequest {
            contents: vec![Content { role: "user", parts }],
        }
    }

    fn extract_text(response: &GenerateContentResponse) -> Option<String> {
        response
            .candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|part| part.text.clone())
    }
}

#[async_trait]
impl VisionProvider for GeminiClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn analyze(&self, request: AnalysisRequest<'_>) -> Result<ProviderReply> {
        if !pricing::supports_model(ProviderKind::Gemini, request.model) {
            return Err(Error::UnsupportedModel {
                provider: ProviderKind::Gemini,
                model: request.model.to_string(),
            });
        }

        let body = Self::build_request(&request);
        debug!(
            model = request.model,
            images = request.transmitted_images(),
            "dispatching Gemini analysis"
        );

        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base_url,
            request.model,
            self.api_key.expose_secret()
        );
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ProviderApi(format!(
                "Gemini API returned {status}: {body}"
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Request(e.to_string()))?;

        let analysis_text = Self::extract_text(&parsed).ok_or_else(|| {
            Error::ProviderApi("Gemini response contained no analysis text".to_string())
        })?;

        let usage = parsed.usage_metadata.as_ref().and_then(UsageMetadata::to_usage);
        info!(
            model = request.model,
            reported_usage = usage.is_some(),
            "Gemini analysis completed"
        );

        Ok(ProviderReply {
            analysis_text,
            usage,
        })
    }
}
