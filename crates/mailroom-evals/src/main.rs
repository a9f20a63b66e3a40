//! Mailroom evaluation runner
//!
//! Loads scenario files, replays each through a hermetic pipeline, scores the
//! results with the grader battery, and prints an aggregate report. Exits
//! non-zero when any grader mean falls below the fail threshold or any
//! scenario file failed to load.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use mailroom_evals::{load_scenarios, AggregateReport, EvalEngine};
use mailroom_pipeline::PipelineConfig;

#[derive(Parser)]
#[command(name = "mailroom-eval")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scenario-driven evaluation for the purchase-order pipeline", long_about = None)]
struct Cli {
    /// Directory containing scenario JSON files
    #[arg(long, default_value = "crates/mailroom-evals/scenarios")]
    scenarios_dir: PathBuf,

    /// Directory containing document fixtures
    #[arg(long, default_value = "crates/mailroom-evals/fixtures")]
    fixtures_dir: PathBuf,

    /// Only run scenarios in this category
    #[arg(short, long)]
    category: Option<String>,

    /// Pipeline config YAML; defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grader means below this value fail the batch
    #[arg(long, default_value_t = 0.7)]
    fail_threshold: f64,

    /// Write the full report as JSON to this path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json);

    let config = match &cli.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            PipelineConfig::from_yaml(&raw)?
        }
        None => PipelineConfig::default(),
    };

    let suite = load_scenarios(
        &cli.scenarios_dir,
        &cli.fixtures_dir,
        cli.category.as_deref(),
    )
    .with_context(|| format!("loading scenarios from {}", cli.scenarios_dir.display()))?;
    info!(
        scenarios = suite.scenarios.len(),
        load_errors = suite.errors.len(),
        "suite loaded"
    );

    let engine = EvalEngine::new(config, cli.fixtures_dir.clone());
    let runs = engine.run_suite(&suite.scenarios).await;
    let report = AggregateReport::new(runs, suite.errors);

    report.print_summary(cli.fail_threshold);

    if let Some(output) = &cli.output {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(output, json)
            .with_context(|| format!("writing report to {}", output.display()))?;
        info!(path = %output.display(), "report written");
    }

    if !report.passed(cli.fail_threshold) {
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        );
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
