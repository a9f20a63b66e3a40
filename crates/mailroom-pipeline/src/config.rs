//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use mailroom_core::{MailroomError, Result};

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_confidence_threshold() -> f32 {
    0.5
}

fn default_spreadsheet_id() -> String {
    "orders-tracking".to_string()
}

fn default_language() -> String {
    "English".to_string()
}

/// Settings the pipeline wiring reads; everything has a working default so a
/// config file only states overrides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    /// Model name passed to the LLM backend.
    #[serde(default = "default_llm_model")]
    pub llm_model: String,

    /// Override for OpenAI-compatible backends served elsewhere.
    #[serde(default)]
    pub llm_base_url: Option<String>,

    /// Fields extracted below this confidence count as missing.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,

    /// Tracking spreadsheet the track stage appends to.
    #[serde(default = "default_spreadsheet_id")]
    pub spreadsheet_id: String,

    /// Language customer replies are written in.
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            llm_model: default_llm_model(),
            llm_base_url: None,
            confidence_threshold: default_confidence_threshold(),
            spreadsheet_id: default_spreadsheet_id(),
            language: default_language(),
        }
    }
}

impl PipelineConfig {
    /// Parse from a YAML document.
    pub fn from_yaml(source: &str) -> Result<Self> {
        serde_yaml::from_str(source)
            .map_err(|e| MailroomError::Config(format!("invalid pipeline config: {e}")))
    }
}
