//! The sequential stage executor.

use std::sync::Arc;

use tracing::{debug, error, info};

use mailroom_core::{EmailEnvelope, PipelineState, StageUpdate};

use crate::stage::Stage;

/// A fixed sequence of stages with one control-flow fork: when classification
/// rejects the email, execution jumps straight to the final stage.
///
/// The executor owns the trajectory. Every stage it visits is appended, even
/// when the stage was a fatal pass-through, so the trajectory is always the
/// record of real control flow.
pub struct Pipeline {
    stages: Vec<Arc<dyn Stage>>,
}

impl Pipeline {
    /// Build from an ordered stage list. The first stage is the classifier
    /// the fork keys on; the last stage always runs.
    pub fn new(stages: Vec<Arc<dyn Stage>>) -> Self {
        Self { stages }
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run the pipeline over one inbound email.
    ///
    /// Never returns an error and never panics: collaborator failures and
    /// stage panics both surface as the `error` terminal status on the
    /// returned state.
    pub async fn run(
        &self,
        email: EmailEnvelope,
        document_bytes: Option<Vec<u8>>,
    ) -> PipelineState {
        let mut state = PipelineState::from_email(email, document_bytes);
        info!(
            message_id = %state.email.message_id,
            subject = %state.email.subject,
            "pipeline run started"
        );

        let mut idx = 0;
        while idx < self.stages.len() {
            let stage = &self.stages[idx];
            // Each stage runs on its own task so a panic inside a stage is
            // joined as an error here instead of unwinding out of the run.
            let task = {
                let stage = Arc::clone(stage);
                let snapshot = state.clone();
                tokio::spawn(async move { stage.run(&snapshot).await })
            };
            let update = match task.await {
                Ok(update) => update,
                Err(e) => {
                    error!(stage = stage.name(), error = %e, "stage panicked");
                    StageUpdate::fatal(format!("{} panicked: {e}", stage.name()))
                }
            };
            state.trajectory.push(stage.name().to_string());
            state.apply(update);
            debug!(stage = stage.name(), fatal = state.is_fatal(), "stage done");

            if idx == 0 && !state.is_fatal() && !state.is_valid_po {
                // Not an order: skip the processing stages, finalize only.
                // max() keeps a single-stage pipeline from revisiting itself.
                idx = (self.stages.len() - 1).max(idx + 1);
            } else {
                idx += 1;
            }
        }

        info!(
            message_id = %state.email.message_id,
            status = ?state.final_status,
            trajectory = ?state.trajectory,
            "pipeline run finished"
        );
        state
    }
}
