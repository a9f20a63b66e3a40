//! Notification stage: replies to the sender in the original thread.
//!
//! Complete orders get a confirmation; incomplete ones get a request for the
//! fields the validator flagged.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use mailroom_core::{MailroomError, PipelineState, Result, StageUpdate};

use crate::services::{ChatMessage, LlmService, PromptStore, ToolManager};
use crate::stage::Stage;

pub struct NotifyStage {
    llm: Arc<dyn LlmService>,
    tools: Arc<dyn ToolManager>,
    prompts: Arc<dyn PromptStore>,
    language: String,
}

impl NotifyStage {
    pub fn new(
        llm: Arc<dyn LlmService>,
        tools: Arc<dyn ToolManager>,
        prompts: Arc<dyn PromptStore>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            llm,
            tools,
            prompts,
            language: language.into(),
        }
    }

    fn field_value<'a>(state: &'a PipelineState, field: &str) -> &'a str {
        state
            .extracted_data
            .as_ref()
            .and_then(|data| data.value(field))
            .unwrap_or("(not provided)")
    }

    fn draft_params(state: &PipelineState) -> (&'static str, serde_json::Value) {
        let order_id = state.po_id.as_deref().unwrap_or("(unknown)");
        if state.missing_fields.is_empty() {
            (
                "confirmation",
                json!({
                    "order_id": order_id,
                    "customer": Self::field_value(state, "customer"),
                    "pickup_location": Self::field_value(state, "pickup_location"),
                    "delivery_location": Self::field_value(state, "delivery_location"),
                    "delivery_datetime": Self::field_value(state, "delivery_datetime"),
                    "driver_name": Self::field_value(state, "driver_name"),
                }),
            )
        } else {
            (
                "missing_info",
                json!({
                    "order_id": order_id,
                    "missing_fields_description": state.missing_fields.join(", "),
                }),
            )
        }
    }

    async fn try_execute(&self, state: &PipelineState) -> Result<StageUpdate> {
        let (template, params) = Self::draft_params(state);
        let system = self.prompts.get_and_render(
            "notify",
            "system",
            &json!({ "language": self.language }),
        )?;
        let draft = self.prompts.get_and_render("notify", template, &params)?;

        let body = self
            .llm
            .generate_text(&[ChatMessage::system(system), ChatMessage::user(draft)])
            .await?;

        let order_id = state.po_id.as_deref().unwrap_or("(unknown)");
        let subject = if state.missing_fields.is_empty() {
            format!("Order Confirmation: {order_id}")
        } else {
            format!("Action Required: Missing info for {order_id}")
        };
        let response = self
            .tools
            .send_email(
                &state.email.sender,
                &subject,
                &body,
                Some(&state.email.message_id),
            )
            .await?;
        if !response.is_ok() {
            return Err(MailroomError::Tool(format!(
                "send_email rejected: {}",
                response.detail.as_deref().unwrap_or("no detail")
            )));
        }
        debug!(template, to = %state.email.sender, "reply sent");

        let confirmation = state.missing_fields.is_empty();
        Ok(StageUpdate {
            confirmation_email_sent: Some(confirmation),
            missing_info_email_sent: Some(!confirmation),
            ..Default::default()
        })
    }
}

#[async_trait]
impl Stage for NotifyStage {
    fn name(&self) -> &'static str {
        "notify"
    }

    async fn execute(&self, state: &PipelineState) -> StageUpdate {
        match self.try_execute(state).await {
            Ok(update) => update,
            Err(e) => StageUpdate::fatal(format!("notify failed: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::prompts::StaticPromptStore;
    use crate::services::recorder::ToolRecorder;
    use crate::services::scripted::ScriptedLlm;
    use mailroom_core::{EmailEnvelope, ExtractionFields};

    fn stage(tools: Arc<ToolRecorder>) -> NotifyStage {
        NotifyStage::new(
            Arc::new(ScriptedLlm::new()),
            tools,
            Arc::new(StaticPromptStore::new()),
            "English",
        )
    }

    fn notify_state(missing: Vec<String>) -> PipelineState {
        let email = EmailEnvelope {
            subject: "Purchase Order PO-2025-001".to_string(),
            body: "Attached.".to_string(),
            sender: "ops@acme.test".to_string(),
            message_id: "msg-1".to_string(),
            has_attachment: true,
        };
        let mut state = PipelineState::from_email(email, None);
        state.po_id = Some("PO-2025-001".to_string());
        let mut data = ExtractionFields::default();
        data.set("order_id", "PO-2025-001".to_string());
        data.set("customer", "Acme Logistics Ltd.".to_string());
        data.set("pickup_location", "Warehouse 4, Rotterdam".to_string());
        data.set("delivery_location", "Dock 12, Hamburg".to_string());
        data.set("delivery_datetime", "2025-07-14 09:00".to_string());
        data.set("driver_name", "Jan Kowalski".to_string());
        data.set("driver_phone", "+48 600 100 200".to_string());
        state.extracted_data = Some(data);
        state.missing_fields = missing;
        state
    }

    #[tokio::test]
    async fn test_complete_order_sends_confirmation_in_thread() {
        let tools = Arc::new(ToolRecorder::new());
        let update = stage(tools.clone()).execute(&notify_state(vec![])).await;

        assert_eq!(update.confirmation_email_sent, Some(true));
        assert_eq!(update.missing_info_email_sent, Some(false));

        let emails = tools.emails_sent();
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].args["to"].as_str(), Some("ops@acme.test"));
        assert_eq!(
            emails[0].args["subject"].as_str(),
            Some("Order Confirmation: PO-2025-001")
        );
        assert_eq!(emails[0].args["thread_id"].as_str(), Some("msg-1"));
        let body = emails[0].args["body"].as_str().expect("body");
        assert!(body.contains("PO-2025-001"));
        assert!(body.contains("Acme Logistics Ltd."));
        assert!(body.to_lowercase().contains("received"));
    }

    #[tokio::test]
    async fn test_incomplete_order_requests_missing_fields() {
        let tools = Arc::new(ToolRecorder::new());
        let state = notify_state(vec!["driver_name".to_string(), "driver_phone".to_string()]);
        let update = stage(tools.clone()).execute(&state).await;

        assert_eq!(update.confirmation_email_sent, Some(false));
        assert_eq!(update.missing_info_email_sent, Some(true));

        let emails = tools.emails_sent();
        assert_eq!(
            emails[0].args["subject"].as_str(),
            Some("Action Required: Missing info for PO-2025-001")
        );
        let body = emails[0].args["body"].as_str().expect("body");
        assert!(body.contains("driver_name, driver_phone"));
        assert!(body.contains("missing"));
    }

    #[tokio::test]
    async fn test_failing_llm_becomes_fatal_update() {
        let tools = Arc::new(ToolRecorder::new());
        let stage = NotifyStage::new(
            Arc::new(ScriptedLlm::failing()),
            tools.clone(),
            Arc::new(StaticPromptStore::new()),
            "English",
        );

        let update = stage.execute(&notify_state(vec![])).await;
        let message = update.error_message.expect("diagnostic set");
        assert!(message.starts_with("notify failed:"));
        assert!(tools.emails_sent().is_empty());
    }
}
