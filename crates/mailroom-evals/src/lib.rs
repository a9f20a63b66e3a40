//! Mailroom Evals
//!
//! Deterministic, scenario-driven evaluation of the purchase-order pipeline.
//! Each scenario file pairs an inbound email (plus optional document fixture)
//! with ground truth; the engine replays it through a hermetic pipeline built
//! on scripted collaborators and a fresh tool recorder, and five graders
//! score what happened. Identical inputs always produce identical scores.

pub mod engine;
pub mod graders;
pub mod loader;
pub mod outcome;
pub mod report;
pub mod scenario;

pub use engine::{EvalEngine, ScenarioRun};
pub use graders::{
    all_graders, ClassificationAccuracy, EmailQuality, ExtractionAccuracy, Grader, HeuristicJudge,
    ReplyJudge, ScoreResult, TrajectoryCorrectness, ValidationCorrectness,
};
pub use loader::{load_scenarios, LoadError, LoadedSuite};
pub use outcome::ActualOutcome;
pub use report::AggregateReport;
pub use scenario::{Expectation, Scenario, ScenarioInput};
