//! Strict trajectory check: the run visited exactly the expected stages.

use crate::graders::{Grader, ScoreResult};
use crate::outcome::ActualOutcome;
use crate::scenario::Expectation;

/// All-or-nothing on the full ordered sequence; a single swapped, missing,
/// or extra stage scores 0.
pub struct TrajectoryCorrectness;

impl Grader for TrajectoryCorrectness {
    fn name(&self) -> &'static str {
        "trajectory_correctness"
    }

    fn score(&self, actual: &ActualOutcome, expected: &Expectation) -> ScoreResult {
        let value = if actual.trajectory == expected.trajectory {
            1.0
        } else {
            0.0
        };
        ScoreResult::new(
            self.name(),
            value,
            format!(
                "expected {:?}, got {:?}",
                expected.trajectory, actual.trajectory
            ),
        )
    }
}
