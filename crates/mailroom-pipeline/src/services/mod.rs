//! Collaborator service contracts.
//!
//! Each external collaborator the stages call is a narrow trait with exactly
//! the methods the stages need, so a real implementation and an inspectable
//! fake can be swapped without touching stage code.

pub mod openai;
pub mod prompts;
pub mod recorder;
pub mod scripted;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use mailroom_core::{ClassificationResponse, ExtractionResponse, Result};

pub use prompts::PromptStore;

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One message in an LLM conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// LLM collaborator: structured classification/extraction plus free text.
#[async_trait]
pub trait LlmService: Send + Sync {
    /// Classify an inbound email as purchase order or not.
    async fn classify(&self, messages: &[ChatMessage]) -> Result<ClassificationResponse>;

    /// Extract purchase-order fields from document text.
    async fn extract(&self, messages: &[ChatMessage]) -> Result<ExtractionResponse>;

    /// Generate a free-text reply.
    async fn generate_text(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// OCR collaborator.
#[async_trait]
pub trait OcrService: Send + Sync {
    /// Extract plain text from document bytes.
    ///
    /// Unreadable input yields empty text, not an error.
    async fn extract_text(&self, bytes: &[u8]) -> Result<String>;
}

/// Status discriminator on a tool call result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    Ok,
    Error,
}

/// Structured result of a side-effecting tool call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolResponse {
    pub status: ToolStatus,
    pub detail: Option<String>,
}

impl ToolResponse {
    pub fn ok() -> Self {
        Self {
            status: ToolStatus::Ok,
            detail: None,
        }
    }

    pub fn error(detail: impl Into<String>) -> Self {
        Self {
            status: ToolStatus::Error,
            detail: Some(detail.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ToolStatus::Ok
    }
}

/// A full email message fetched by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FetchedMessage {
    pub text: String,
    pub subject: String,
    pub sender: String,
}

/// Side-effecting collaborator: mail and spreadsheet operations.
///
/// Every method returns a structured result; stages treat a non-ok status the
/// same way as an `Err` (converted to the fatal state marker, never
/// propagated raw).
#[async_trait]
pub trait ToolManager: Send + Sync {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        thread_id: Option<&str>,
    ) -> Result<ToolResponse>;

    async fn append_row(&self, sheet_id: &str, values: &[String]) -> Result<ToolResponse>;

    async fn fetch_attachment(&self, message_id: &str, attachment_id: &str) -> Result<Vec<u8>>;

    async fn fetch_message(&self, message_id: &str) -> Result<FetchedMessage>;
}
