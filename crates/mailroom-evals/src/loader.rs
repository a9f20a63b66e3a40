//! Scenario discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use mailroom_core::MailroomError;

use crate::scenario::Scenario;

/// A scenario file that could not be loaded. Carried into the report so a
/// broken file never silently shrinks the suite.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LoadError {
    pub path: String,
    pub message: String,
}

/// Result of scanning a scenarios directory.
#[derive(Debug, Default)]
pub struct LoadedSuite {
    pub scenarios: Vec<Scenario>,
    pub errors: Vec<LoadError>,
}

/// Read every `*.json` scenario in `dir`, sorted by file name.
///
/// `category` filters after parsing. Malformed files and scenarios whose
/// fixture does not exist under `fixtures_dir` are recorded as load errors.
pub fn load_scenarios(
    dir: &Path,
    fixtures_dir: &Path,
    category: Option<&str>,
) -> Result<LoadedSuite, MailroomError> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut suite = LoadedSuite::default();
    for path in paths {
        match load_one(&path, fixtures_dir) {
            Ok(scenario) => {
                if category.is_some_and(|c| c != scenario.category) {
                    debug!(id = %scenario.id, "scenario filtered out by category");
                    continue;
                }
                suite.scenarios.push(scenario);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "scenario failed to load");
                suite.errors.push(LoadError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                });
            }
        }
    }
    Ok(suite)
}

fn load_one(path: &Path, fixtures_dir: &Path) -> Result<Scenario, MailroomError> {
    let raw = fs::read_to_string(path)?;
    let scenario: Scenario =
        serde_json::from_str(&raw).map_err(|e| MailroomError::ScenarioLoad {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    // Existence check only; the engine reads the bytes fresh per run.
    if let Some(fixture) = &scenario.input.fixture {
        let fixture_path = fixtures_dir.join(fixture);
        if !fixture_path.is_file() {
            return Err(MailroomError::FixtureNotFound {
                path: fixture_path.display().to_string(),
            });
        }
    }
    Ok(scenario)
}
