//! Extraction stage: attachment bytes -> OCR text -> structured fields.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use mailroom_core::{PipelineState, Result, StageUpdate};

use crate::services::{ChatMessage, LlmService, OcrService, PromptStore, ToolManager};
use crate::stage::Stage;

pub struct ExtractStage {
    ocr: Arc<dyn OcrService>,
    llm: Arc<dyn LlmService>,
    tools: Arc<dyn ToolManager>,
    prompts: Arc<dyn PromptStore>,
}

impl ExtractStage {
    pub fn new(
        ocr: Arc<dyn OcrService>,
        llm: Arc<dyn LlmService>,
        tools: Arc<dyn ToolManager>,
        prompts: Arc<dyn PromptStore>,
    ) -> Self {
        Self {
            ocr,
            llm,
            tools,
            prompts,
        }
    }

    async fn try_execute(&self, state: &PipelineState) -> Result<StageUpdate> {
        // Webhook payloads may or may not carry the attachment inline; fetch
        // it by message id when the flag is set but the bytes are absent.
        let (bytes, fetched) = match &state.document_bytes {
            Some(bytes) => (bytes.clone(), None),
            None if state.email.has_attachment => {
                let bytes = self
                    .tools
                    .fetch_attachment(&state.email.message_id, "attachment-1")
                    .await?;
                (bytes.clone(), Some(bytes))
            }
            None => (Vec::new(), None),
        };

        let text = self.ocr.extract_text(&bytes).await?;
        debug!(ocr_chars = text.len(), "document text extracted");

        let system = self.prompts.get_and_render("extract", "system", &json!({}))?;
        let user = self
            .prompts
            .get_and_render("extract", "user", &json!({ "document_text": text }))?;

        let extraction = self
            .llm
            .extract(&[ChatMessage::system(system), ChatMessage::user(user)])
            .await?;

        Ok(StageUpdate {
            document_bytes: fetched,
            raw_ocr_text: Some(text),
            extracted_data: Some(extraction.data),
            field_confidences: Some(extraction.field_confidences),
            extraction_warnings: Some(extraction.warnings),
            ..Default::default()
        })
    }
}

#[async_trait]
impl Stage for ExtractStage {
    fn name(&self) -> &'static str {
        "extract"
    }

    async fn execute(&self, state: &PipelineState) -> StageUpdate {
        match self.try_execute(state).await {
            Ok(update) => update,
            Err(e) => StageUpdate::fatal(format!("extract failed: {e}")),
        }
    }
}
