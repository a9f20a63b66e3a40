//! Runs the shipped scenario suite end to end through the engine.

use std::path::PathBuf;

use mailroom_evals::{load_scenarios, AggregateReport, EvalEngine, ScenarioRun};
use mailroom_pipeline::PipelineConfig;

fn scenarios_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios")
}

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

async fn run_suite(category: Option<&str>) -> Vec<ScenarioRun> {
    let suite = load_scenarios(&scenarios_dir(), &fixtures_dir(), category).expect("load suite");
    assert!(suite.errors.is_empty(), "load errors: {:?}", suite.errors);
    EvalEngine::new(PipelineConfig::default(), fixtures_dir())
        .run_suite(&suite.scenarios)
        .await
}

fn score_of(run: &ScenarioRun, grader: &str) -> f64 {
    run.scores
        .iter()
        .find(|s| s.name == grader)
        .unwrap_or_else(|| panic!("{} missing grader {grader}", run.scenario_id))
        .value
}

fn find<'a>(runs: &'a [ScenarioRun], id: &str) -> &'a ScenarioRun {
    runs.iter()
        .find(|r| r.scenario_id == id)
        .unwrap_or_else(|| panic!("scenario {id} not in suite"))
}

#[tokio::test]
async fn test_shipped_suite_loads_and_runs_clean() {
    let runs = run_suite(None).await;
    assert_eq!(runs.len(), 6);
    assert!(runs.iter().all(|r| r.error.is_none()));
}

#[tokio::test]
async fn test_happy_path_scenarios_score_perfectly() {
    let runs = run_suite(Some("happy_path")).await;
    assert_eq!(runs.len(), 2);
    for run in &runs {
        for score in &run.scores {
            assert_eq!(
                score.value, 1.0,
                "{} / {}: {}",
                run.scenario_id, score.name, score.reason
            );
        }
        assert!(run.fixture_digest.is_some());
    }
}

#[tokio::test]
async fn test_not_a_po_scenarios_fork_and_stay_silent() {
    let runs = run_suite(Some("not_a_po")).await;
    assert_eq!(runs.len(), 2);
    for run in &runs {
        assert_eq!(score_of(run, "classification_accuracy"), 1.0);
        assert_eq!(score_of(run, "trajectory_correctness"), 1.0);
        assert_eq!(score_of(run, "email_quality"), 1.0);
    }
}

#[tokio::test]
async fn test_missing_fields_scenario_scores() {
    let runs = run_suite(Some("missing_fields")).await;
    let run = find(&runs, "missing_fields_partial_order");

    assert_eq!(score_of(run, "classification_accuracy"), 1.0);
    assert_eq!(score_of(run, "extraction_accuracy"), 1.0);
    assert_eq!(score_of(run, "trajectory_correctness"), 1.0);
    assert_eq!(score_of(run, "validation_correctness"), 1.0);
    // The missing-info reply names the order but not the customer
    assert_eq!(score_of(run, "email_quality"), 0.75);
}

#[tokio::test]
async fn test_error_scenario_keeps_full_trajectory() {
    let runs = run_suite(Some("error")).await;
    let run = find(&runs, "error_corrupt_scan");

    assert_eq!(score_of(run, "classification_accuracy"), 1.0);
    assert_eq!(score_of(run, "extraction_accuracy"), 1.0);
    // All six stage names even though extract failed
    assert_eq!(score_of(run, "trajectory_correctness"), 1.0);
    assert_eq!(score_of(run, "validation_correctness"), 1.0);
    // No reply on a non-skipped run is a quality failure
    assert_eq!(score_of(run, "email_quality"), 0.0);
}

#[tokio::test]
async fn test_two_full_runs_produce_identical_scores() {
    let first = run_suite(None).await;
    let second = run_suite(None).await;

    let flatten = |runs: &[ScenarioRun]| -> Vec<(String, String, f64)> {
        runs.iter()
            .flat_map(|r| {
                r.scores
                    .iter()
                    .map(move |s| (r.scenario_id.clone(), s.name.clone(), s.value))
            })
            .collect()
    };
    assert_eq!(flatten(&first), flatten(&second));
}

#[tokio::test]
async fn test_scenario_isolation_category_runs_match_full_run() {
    // Per-category runs see the same scores as the full batch; nothing leaks
    // from earlier scenarios into later ones.
    let full = run_suite(None).await;
    let error_only = run_suite(Some("error")).await;

    let from_full = find(&full, "error_corrupt_scan");
    let isolated = find(&error_only, "error_corrupt_scan");
    for (a, b) in from_full.scores.iter().zip(&isolated.scores) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.value, b.value);
    }
}

#[tokio::test]
async fn test_aggregate_report_means_and_serialization() {
    let runs = run_suite(None).await;
    let report = AggregateReport::new(runs, vec![]);

    let means = report.grader_means();
    assert_eq!(means["classification_accuracy"], 1.0);
    assert_eq!(means["trajectory_correctness"], 1.0);
    assert_eq!(means["validation_correctness"], 1.0);
    assert_eq!(means["extraction_accuracy"], 1.0);
    // 4 x 1.0, one 0.75, one 0.0 across six scenarios
    let email_mean = means["email_quality"];
    assert!((email_mean - 4.75 / 6.0).abs() < 1e-9, "got {email_mean}");

    let by_category = report.category_means();
    assert_eq!(by_category["happy_path"]["email_quality"], 1.0);
    assert_eq!(by_category["error"]["email_quality"], 0.0);

    assert!(report.passed(0.7));
    assert!(!report.passed(0.9));

    let json = serde_json::to_string(&report).expect("serialize report");
    assert!(json.contains("\"run_id\""));
    assert!(json.contains("error_corrupt_scan"));
}
