//! Finalization stage: derives the terminal status from the accumulated state.

use async_trait::async_trait;
use tracing::info;

use mailroom_core::{PipelineState, StageUpdate, TerminalStatus};

use crate::stage::Stage;

pub struct FinalizeStage;

impl FinalizeStage {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FinalizeStage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Stage for FinalizeStage {
    fn name(&self) -> &'static str {
        "finalize"
    }

    async fn execute(&self, state: &PipelineState) -> StageUpdate {
        // A fatal run never reaches this point; run() passes it through and
        // the error status survives untouched.
        let status = if !state.is_valid_po {
            TerminalStatus::Skipped
        } else if !state.missing_fields.is_empty() {
            TerminalStatus::MissingInfo
        } else {
            TerminalStatus::Completed
        };

        info!(status = status.as_str(), po_id = ?state.po_id, "run finalized");

        StageUpdate {
            final_status: Some(status),
            ..Default::default()
        }
    }
}
