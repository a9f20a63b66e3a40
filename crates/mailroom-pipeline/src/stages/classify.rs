//! Classification stage: is this email a genuine purchase order?

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use mailroom_core::{PipelineState, Result, StageUpdate};

use crate::services::{ChatMessage, LlmService, PromptStore};
use crate::stage::Stage;

pub struct ClassifyStage {
    llm: Arc<dyn LlmService>,
    prompts: Arc<dyn PromptStore>,
}

impl ClassifyStage {
    pub fn new(llm: Arc<dyn LlmService>, prompts: Arc<dyn PromptStore>) -> Self {
        Self { llm, prompts }
    }

    async fn try_execute(&self, state: &PipelineState) -> Result<StageUpdate> {
        let system = self.prompts.get_and_render("classify", "system", &json!({}))?;
        let user = self.prompts.get_and_render(
            "classify",
            "user",
            &json!({
                "email_subject": state.email.subject,
                "email_sender": state.email.sender,
                "email_body": state.email.body,
                "has_attachment": state.email.has_attachment,
            }),
        )?;

        let verdict = self
            .llm
            .classify(&[ChatMessage::system(system), ChatMessage::user(user)])
            .await?;

        debug!(
            is_valid_po = verdict.is_valid_po,
            po_id = verdict.po_id.as_deref().unwrap_or("-"),
            "classification verdict"
        );

        Ok(StageUpdate {
            is_valid_po: Some(verdict.is_valid_po),
            po_id: verdict.po_id,
            classification_reason: Some(verdict.reason),
            ..Default::default()
        })
    }
}

#[async_trait]
impl Stage for ClassifyStage {
    fn name(&self) -> &'static str {
        "classify"
    }

    async fn execute(&self, state: &PipelineState) -> StageUpdate {
        match self.try_execute(state).await {
            Ok(update) => update,
            Err(e) => StageUpdate::fatal(format!("classify failed: {e}")),
        }
    }
}
