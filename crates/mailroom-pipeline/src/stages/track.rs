//! Tracking stage: appends the order to the tracking spreadsheet.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use mailroom_core::{MailroomError, PipelineState, Result, StageUpdate, EXTRACTION_FIELDS};

use crate::services::ToolManager;
use crate::stage::Stage;

pub struct TrackStage {
    tools: Arc<dyn ToolManager>,
    spreadsheet_id: String,
}

impl TrackStage {
    pub fn new(tools: Arc<dyn ToolManager>, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            tools,
            spreadsheet_id: spreadsheet_id.into(),
        }
    }

    /// Row layout: order id, the six remaining fields in canonical order,
    /// then a row status token.
    fn build_row(state: &PipelineState) -> Vec<String> {
        let mut row = Vec::with_capacity(EXTRACTION_FIELDS.len() + 1);
        row.push(state.po_id.clone().unwrap_or_default());
        for field in &EXTRACTION_FIELDS[1..] {
            let value = state
                .extracted_data
                .as_ref()
                .and_then(|data| data.value(field))
                .unwrap_or("")
                .to_string();
            row.push(value);
        }
        let row_status = if state.missing_fields.is_empty() {
            "complete"
        } else {
            "pending_info"
        };
        row.push(row_status.to_string());
        row
    }

    async fn try_execute(&self, state: &PipelineState) -> Result<StageUpdate> {
        let row = Self::build_row(state);
        let response = self.tools.append_row(&self.spreadsheet_id, &row).await?;
        if !response.is_ok() {
            return Err(MailroomError::Tool(format!(
                "append_row rejected: {}",
                response.detail.as_deref().unwrap_or("no detail")
            )));
        }
        debug!(spreadsheet_id = %self.spreadsheet_id, "order row appended");

        Ok(StageUpdate {
            sheet_row_added: Some(true),
            ..Default::default()
        })
    }
}

#[async_trait]
impl Stage for TrackStage {
    fn name(&self) -> &'static str {
        "track"
    }

    async fn execute(&self, state: &PipelineState) -> StageUpdate {
        match self.try_execute(state).await {
            Ok(update) => update,
            Err(e) => StageUpdate::fatal(format!("track failed: {e}")),
        }
    }
}
