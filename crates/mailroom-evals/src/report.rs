//! Aggregation and presentation of a finished evaluation batch.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::engine::ScenarioRun;
use crate::loader::LoadError;

/// The whole batch: every score, the aggregates, and what failed to load.
/// Serializes to the JSON report artifact.
#[derive(Debug, Serialize)]
pub struct AggregateReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub runs: Vec<ScenarioRun>,
    pub load_errors: Vec<LoadError>,
}

impl AggregateReport {
    pub fn new(runs: Vec<ScenarioRun>, load_errors: Vec<LoadError>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            runs,
            load_errors,
        }
    }

    /// Mean per grader across every scenario, keyed by grader name.
    pub fn grader_means(&self) -> BTreeMap<String, f64> {
        Self::means_over(self.runs.iter())
    }

    /// Per-category grader means, keyed by category.
    pub fn category_means(&self) -> BTreeMap<String, BTreeMap<String, f64>> {
        let mut categories: BTreeMap<String, Vec<&ScenarioRun>> = BTreeMap::new();
        for run in &self.runs {
            categories.entry(run.category.clone()).or_default().push(run);
        }
        categories
            .into_iter()
            .map(|(category, runs)| (category, Self::means_over(runs.into_iter())))
            .collect()
    }

    fn means_over<'a>(runs: impl Iterator<Item = &'a ScenarioRun>) -> BTreeMap<String, f64> {
        let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        for run in runs {
            for score in &run.scores {
                let entry = sums.entry(score.name.clone()).or_insert((0.0, 0));
                entry.0 += score.value;
                entry.1 += 1;
            }
        }
        sums.into_iter()
            .map(|(name, (sum, count))| (name, sum / count as f64))
            .collect()
    }

    /// Scenario/grader pairs scoring below `threshold`.
    pub fn failures(&self, threshold: f64) -> Vec<(&ScenarioRun, &crate::graders::ScoreResult)> {
        self.runs
            .iter()
            .flat_map(|run| run.scores.iter().map(move |score| (run, score)))
            .filter(|(_, score)| score.value < threshold)
            .collect()
    }

    /// Whether any grader mean falls below `threshold`. Load errors also
    /// count as failure; a suite that partially loaded must not pass.
    pub fn passed(&self, threshold: f64) -> bool {
        self.load_errors.is_empty()
            && self.grader_means().values().all(|mean| *mean >= threshold)
    }

    pub fn print_summary(&self, threshold: f64) {
        println!("\n========== EVALUATION REPORT ==========\n");
        println!("Run:       {}", self.run_id);
        println!("Started:   {}", self.started_at.to_rfc3339());
        println!("Scenarios: {}", self.runs.len());

        println!("\n---------- Grader Means ----------\n");
        for (name, mean) in self.grader_means() {
            let status = if mean >= threshold { "PASS" } else { "FAIL" };
            println!("[{status}] {name:<26} {mean:.3}");
        }

        println!("\n---------- Scenario Details ----------\n");
        for run in &self.runs {
            let status = if run.error.is_some() { "ERROR" } else { "OK" };
            print!(
                "[{status}] {} ({}) mean={:.3}",
                run.scenario_id,
                run.category,
                run.mean_score()
            );
            match &run.fixture_digest {
                Some(digest) => println!(" fixture=sha256:{}", &digest[..12]),
                None => println!(),
            }
        }

        println!("\n---------- By Category ----------\n");
        for (category, means) in self.category_means() {
            println!("{category}:");
            for (name, mean) in means {
                println!("  {name:<26} {mean:.3}");
            }
        }

        let failures = self.failures(threshold);
        if !failures.is_empty() {
            println!("\n---------- Failing Scores ----------\n");
            for (run, score) in failures {
                println!(
                    "{} / {}: {:.3} - {}",
                    run.scenario_id, score.name, score.value, score.reason
                );
            }
        }

        if !self.load_errors.is_empty() {
            println!("\n---------- Load Errors ----------\n");
            for error in &self.load_errors {
                println!("{}: {}", error.path, error.message);
            }
        }
        println!("\n========================================\n");
    }
}
