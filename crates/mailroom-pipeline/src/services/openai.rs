//! OpenAI-compatible LLM client for production wiring.
//!
//! Structured calls (`classify`, `extract`) request JSON-object responses and
//! parse them with serde; `generate_text` returns the raw completion.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use mailroom_core::{ClassificationResponse, ExtractionResponse, MailroomError, Result};

use super::{ChatMessage, LlmService};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat-completions client for OpenAI or any compatible endpoint.
pub struct OpenAiLlm {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiLlm {
    /// Create a new client against the default OpenAI endpoint.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create with a custom base URL (Azure or compatible APIs).
    pub fn with_base_url(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
        }
    }

    /// Create from environment variables.
    ///
    /// Reads `OPENAI_API_KEY` (required), `OPENAI_MODEL` (default
    /// "gpt-4o-mini"), and `OPENAI_BASE_URL` (optional).
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            MailroomError::Config("OPENAI_API_KEY environment variable not set".to_string())
        })?;
        let model =
            std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok(Self::with_base_url(api_key, model, base_url))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, messages: &[ChatMessage], json_mode: bool) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            temperature: 0.0,
            response_format: json_mode.then(|| ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| MailroomError::Llm(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailroomError::Llm(format!(
                "endpoint returned {status}: {body}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| MailroomError::Llm(format!("malformed response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| MailroomError::Llm("response contained no choices".to_string()))
    }
}

#[async_trait]
impl LlmService for OpenAiLlm {
    async fn classify(&self, messages: &[ChatMessage]) -> Result<ClassificationResponse> {
        let content = self.chat(messages, true).await?;
        serde_json::from_str(&content)
            .map_err(|e| MailroomError::Llm(format!("invalid classification payload: {e}")))
    }

    async fn extract(&self, messages: &[ChatMessage]) -> Result<ExtractionResponse> {
        let content = self.chat(messages, true).await?;
        serde_json::from_str(&content)
            .map_err(|e| MailroomError::Llm(format!("invalid extraction payload: {e}")))
    }

    async fn generate_text(&self, messages: &[ChatMessage]) -> Result<String> {
        self.chat(messages, false).await
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}
