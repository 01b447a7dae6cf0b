//! OpenAI vision client.
//!
//! Images travel as base64 data-URIs inside a chat-style multi-part user
//! message; exact token usage comes back in the response envelope.

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

/// Default OpenAI API base URL.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Upper bound on generated tokens for the structured analysis text.
const MAX_COMPLETION_TOKENS: u32 = 1500;

/// Low temperature keeps violation reports consistent across calls.
const TEMPERATURE: f32 = 0.2;

// ────────────────────────────────────────────────────────────────────────────
// OpenAI API Request/Response Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
    detail: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: CompletionUsage,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

// ────────────────────────────────────────────────────────────────────────────
// OpenAiClient
// ────────────────────────────────────────────────────────────────────────────

/// Client for OpenAI vision-capable chat models.
pub struct OpenAiClient {
    base_url: String,
    api_key: ApiKey,
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Create a client against the public OpenAI endpoint.
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

    /// Create a client with the key from `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(api_key_from_env(ProviderKind::OpenAi)?))
    }

    /// Get the base URL for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn data_uri(bytes: &[u8]) -> String {
        format!("data:image/jpeg;base64,{}", BASE64_STANDARD.encode(bytes))
    }

    fn image_part(bytes: &[u8]) -> ContentPart {
        ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: Self::data_uri(bytes),
                detail: "high",
            },
        }
    }

    fn build_request(request: &AnalysisRequest<'_>) -> ChatCompletionRequest {
        let mut content = Vec::with_capacity(request.candidate_images.len() + 2);
        content.push(ContentPart::Text {
            text: request.prompt.to_string(),
        });
        content.push(Self::image_part(request.reference_image));
        for image in request.candidate_images {
            content.push(Self::image_part(image));
        }

        ChatCompletionRequest {
            model: request.model.to_string(),
            messages: vec![ChatMessage {
                role: "user",
                content,
            }],
            max_tokens: MAX_COMPLETION_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

#[async_trait]
impl VisionProvider for OpenAiClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    async fn analyze(&self, request: AnalysisRequest<'_>) -> Result<ProviderReply> {
        if !pricing::supports_model(ProviderKind::OpenAi, request.model) {
            return Err(Error::UnsupportedModel {
                provider: ProviderKind::OpenAi,
                model: request.model.to_string(),
            });
        }

        let body = Self::build_request(&request);
        debug!(
            model = request.model,
            images = request.transmitted_images(),
            "dispatching OpenAI analysis"
        );

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ProviderApi(format!(
                "OpenAI API returned {status}: {body}"
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Request(e.to_string()))?;

        let analysis_text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::ProviderApi("OpenAI response contained no choices".to_string()))?;

        let usage = TokenUsage::new(parsed.usage.prompt_tokens, parsed.usage.completion_tokens);
        info!(
            model = request.model,
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "OpenAI analysis completed"
        );

        Ok(ProviderReply {
            analysis_text,
            usage: Some(usage),
        })
    }
}
