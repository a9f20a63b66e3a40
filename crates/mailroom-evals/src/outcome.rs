//! What actually happened in a run, in the shape the graders consume.

use serde::Serialize;

use mailroom_core::{ExtractionFields, PipelineState};
use mailroom_pipeline::{ActionKind, ToolRecorder};

/// Flattened view over the final pipeline state and the recorded tool calls.
#[derive(Debug, Clone, Serialize)]
pub struct ActualOutcome {
    pub is_valid_po: bool,
    pub extracted_data: Option<ExtractionFields>,
    pub trajectory: Vec<String>,
    pub missing_fields: Vec<String>,
    /// Terminal status token; empty when the run never set one.
    pub final_status: String,
    /// Body of the first reply the run sent, if any.
    pub reply_body: Option<String>,
    pub sheet_row_added: bool,
    pub confirmation_email_sent: bool,
    pub missing_info_email_sent: bool,
}

impl ActualOutcome {
    pub fn from_run(state: &PipelineState, recorder: &ToolRecorder) -> Self {
        let reply_body = recorder
            .actions_of_kind(ActionKind::SendEmail)
            .first()
            .and_then(|action| action.args["body"].as_str().map(str::to_string));

        Self {
            is_valid_po: state.is_valid_po,
            extracted_data: state.extracted_data.clone(),
            trajectory: state.trajectory.clone(),
            missing_fields: state.missing_fields.clone(),
            final_status: state
                .final_status
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
            reply_body,
            sheet_row_added: state.sheet_row_added,
            confirmation_email_sent: state.confirmation_email_sent,
            missing_info_email_sent: state.missing_info_email_sent,
        }
    }
}
