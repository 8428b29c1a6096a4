use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::policy::PolicyProfile;
use crate::prompt::{PromptDocument, PromptSegment};
use haulsight_common::error::{HaulsightError, HaulsightResult};

/// Hard ceiling on requested output length, bounding cost and latency no
/// matter what the environment says.
pub const MAX_OUTPUT_TOKENS_CAP: u32 = 512;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 220;
const DEFAULT_TIMEOUT_SECS: u64 = 90;

#[derive(Debug, Clone)]
pub struct VisionClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_output_tokens: u32,
    pub timeout_secs: u64,
    pub policy_profile: PolicyProfile,
}

impl VisionClientConfig {
    /// Load provider config from environment. `VISION_API_KEY` is required;
    /// everything else has a default.
    pub fn from_env() -> HaulsightResult<Self> {
        let api_key = std::env::var("VISION_API_KEY")
            .map_err(|_| HaulsightError::Config("VISION_API_KEY is required but not set".into()))?;

        let base_url =
            std::env::var("VISION_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("VISION_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let max_output_tokens = std::env::var("VISION_MAX_OUTPUT_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS)
            .min(MAX_OUTPUT_TOKENS_CAP);

        let timeout_secs = std::env::var("VISION_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let policy_profile = match std::env::var("VISION_POLICY_PROFILE") {
            Ok(name) => PolicyProfile::from_name(&name).ok_or_else(|| {
                HaulsightError::Config(format!("unknown VISION_POLICY_PROFILE: {name}"))
            })?,
            Err(_) => PolicyProfile::default(),
        };

        Ok(Self {
            base_url,
            api_key,
            model,
            max_output_tokens,
            timeout_secs,
            policy_profile,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VisionClientError {
    #[error("HTTP {status}: {body}")]
    HttpError { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("provider response carried no text content")]
    MissingContent,
}

// ── Wire types (OpenAI-compatible chat completions) ─────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: MessageContent<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent<'a> {
    Text(&'a str),
    Parts(Vec<ContentPart>),
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

/// Client for any endpoint speaking the chat-completions wire format with
/// interleaved text and image parts. Images travel inline as base64 data
/// URLs. One request per invocation: a failed call is surfaced, never
/// retried, because a duplicate multimodal call is a duplicate bill.
pub struct VisionClient {
    client: Client,
    config: VisionClientConfig,
}

impl VisionClient {
    pub fn new(config: VisionClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// For testing: point the client at a specific base URL (e.g., wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = base_url.to_string();
        self
    }

    /// Send the policy text and assembled document, returning the raw model
    /// text. The policy travels verbatim as the system message.
    pub async fn complete(
        &self,
        policy_text: &str,
        doc: &PromptDocument,
    ) -> Result<String, VisionClientError> {
        let parts = doc
            .segments
            .iter()
            .map(|segment| match segment {
                PromptSegment::Text(text) => ContentPart::Text { text: text.clone() },
                PromptSegment::Image(blob) => ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: format!(
                            "data:{};base64,{}",
                            blob.media_type,
                            BASE64.encode(&blob.data)
                        ),
                    },
                },
            })
            .collect();

        let request = ChatRequest {
            model: &self.config.model,
            max_tokens: self.config.max_output_tokens.min(MAX_OUTPUT_TOKENS_CAP),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MessageContent::Text(policy_text),
                },
                ChatMessage {
                    role: "user",
                    content: MessageContent::Parts(parts),
                },
            ],
        };

        let url = format!("{}/chat/completions", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, "vision provider returned an error");
            return Err(VisionClientError::HttpError { status, body });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(VisionClientError::MissingContent)
    }
}
