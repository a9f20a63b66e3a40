//! The stage contract.

use async_trait::async_trait;

use mailroom_core::{PipelineState, StageUpdate};

/// One named unit of pipeline work.
///
/// A stage consumes the accumulated state and produces a sparse update. It
/// must never return an error for a domain failure: collaborator errors are
/// caught inside `execute` and converted to a fatal update
/// (`StageUpdate::fatal`), which poisons every downstream stage.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Stage name as it appears in the trajectory.
    fn name(&self) -> &'static str;

    /// Stage logic. Only called when the incoming state is not fatal.
    async fn execute(&self, state: &PipelineState) -> StageUpdate;

    /// Entry point used by the executor.
    ///
    /// When the incoming state carries the fatal marker the stage is a no-op
    /// that contributes nothing; the executor still records its name in the
    /// trajectory. Living here rather than in each stage body means no stage
    /// can forget the check.
    async fn run(&self, state: &PipelineState) -> StageUpdate {
        if state.is_fatal() {
            return StageUpdate::none();
        }
        self.execute(state).await
    }
}
