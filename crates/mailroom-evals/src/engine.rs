//! Runs scenarios through hermetic pipelines and scores the results.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{error, info};

use mailroom_core::Result;
use mailroom_pipeline::{PipelineBuilder, PipelineConfig, ToolRecorder};

use crate::graders::{all_graders, ScoreResult};
use crate::outcome::ActualOutcome;
use crate::scenario::Scenario;

/// Scores and provenance for one scenario run.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioRun {
    pub scenario_id: String,
    pub category: String,
    pub scores: Vec<ScoreResult>,
    /// SHA-256 of the fixture bytes fed into the run, for reproducibility.
    pub fixture_digest: Option<String>,
    /// Set when the run itself failed before scoring could be meaningful.
    pub error: Option<String>,
}

impl ScenarioRun {
    pub fn mean_score(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().map(|s| s.value).sum::<f64>() / self.scores.len() as f64
    }
}

/// Sequential scenario runner.
///
/// Isolation is structural: every scenario gets a freshly constructed
/// recorder and pipeline, and fixture bytes are re-read from disk, so no
/// state can leak between runs even in principle.
#[derive(Clone)]
pub struct EvalEngine {
    config: PipelineConfig,
    fixtures_dir: PathBuf,
}

impl EvalEngine {
    pub fn new(config: PipelineConfig, fixtures_dir: PathBuf) -> Self {
        Self {
            config,
            fixtures_dir,
        }
    }

    pub async fn run_suite(&self, scenarios: &[Scenario]) -> Vec<ScenarioRun> {
        let mut runs = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            runs.push(self.run_scenario(scenario).await);
        }
        runs
    }

    /// Run and score one scenario. Never aborts the batch: a setup failure,
    /// and even a panic anywhere in the run or scoring path, scores 0.0 on
    /// every grader with the failure as the rationale.
    pub async fn run_scenario(&self, scenario: &Scenario) -> ScenarioRun {
        info!(scenario = %scenario.id, category = %scenario.category, "running scenario");
        // The run executes on its own task; joining it converts a panic into
        // an error instead of unwinding through the batch loop.
        let task = {
            let engine = self.clone();
            let owned = scenario.clone();
            tokio::spawn(async move { engine.try_run(&owned).await })
        };
        match task.await {
            Ok(Ok(run)) => run,
            Ok(Err(e)) => {
                error!(scenario = %scenario.id, error = %e, "scenario run failed");
                self.failed_run(scenario, e.to_string())
            }
            Err(e) => {
                error!(scenario = %scenario.id, error = %e, "scenario run panicked");
                self.failed_run(scenario, format!("scenario run panicked: {e}"))
            }
        }
    }

    fn failed_run(&self, scenario: &Scenario, message: String) -> ScenarioRun {
        let scores = all_graders()
            .iter()
            .map(|g| ScoreResult::new(g.name(), 0.0, message.clone()))
            .collect();
        ScenarioRun {
            scenario_id: scenario.id.clone(),
            category: scenario.category.clone(),
            scores,
            fixture_digest: None,
            error: Some(message),
        }
    }

    async fn try_run(&self, scenario: &Scenario) -> Result<ScenarioRun> {
        let (document_bytes, fixture_digest) = match &scenario.input.fixture {
            Some(fixture) => {
                let bytes = fs::read(self.fixtures_dir.join(fixture))?;
                let digest = hex::encode(Sha256::digest(&bytes));
                (Some(bytes), Some(digest))
            }
            None => (None, None),
        };

        let recorder = Arc::new(ToolRecorder::new());
        let pipeline = PipelineBuilder::scripted(self.config.clone(), recorder.clone())?;
        let state = pipeline
            .run(scenario.input.envelope(), document_bytes)
            .await;

        let outcome = ActualOutcome::from_run(&state, &recorder);
        let scores = all_graders()
            .iter()
            .map(|g| g.score(&outcome, &scenario.expected))
            .collect();

        Ok(ScenarioRun {
            scenario_id: scenario.id.clone(),
            category: scenario.category.clone(),
            scores,
            fixture_digest,
            error: None,
        })
    }
}
