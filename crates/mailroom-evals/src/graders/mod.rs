//! Graders: pure functions from (actual, expected) to a score in [0, 1].
//!
//! A grader never fails and never touches the pipeline; everything it needs
//! is in the outcome and the expectation.

pub mod classification;
pub mod email_quality;
pub mod extraction;
pub mod trajectory;
pub mod validation;

use serde::Serialize;

use crate::outcome::ActualOutcome;
use crate::scenario::Expectation;

pub use classification::ClassificationAccuracy;
pub use email_quality::{EmailQuality, HeuristicJudge, ReplyJudge};
pub use extraction::ExtractionAccuracy;
pub use trajectory::TrajectoryCorrectness;
pub use validation::ValidationCorrectness;

/// One grader's verdict on one scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreResult {
    pub name: String,
    /// In [0.0, 1.0].
    pub value: f64,
    pub reason: String,
}

impl ScoreResult {
    pub fn new(name: &str, value: f64, reason: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value,
            reason: reason.into(),
        }
    }
}

/// Scores one aspect of a finished run against the scenario's ground truth.
pub trait Grader: Send + Sync {
    fn name(&self) -> &'static str;

    fn score(&self, actual: &ActualOutcome, expected: &Expectation) -> ScoreResult;
}

/// The full grader battery, in report order.
pub fn all_graders() -> Vec<Box<dyn Grader>> {
    vec![
        Box::new(ClassificationAccuracy),
        Box::new(ExtractionAccuracy),
        Box::new(TrajectoryCorrectness),
        Box::new(ValidationCorrectness),
        Box::new(EmailQuality::new(Box::new(HeuristicJudge))),
    ]
}
