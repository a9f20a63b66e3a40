//! Domain-level error taxonomy for Mailroom.

/// Mailroom domain errors.
///
/// Collaborator failures (`Llm`, `Ocr`, `Tool`) are recovered at the stage
/// boundary and converted into the fatal state marker; they never cross the
/// pipeline executor.
#[derive(Debug, thiserror::Error)]
pub enum MailroomError {
    #[error("llm call failed: {0}")]
    Llm(String),

    #[error("ocr call failed: {0}")]
    Ocr(String),

    #[error("tool call failed: {0}")]
    Tool(String),

    #[error("prompt template '{category}/{name}' not found")]
    PromptNotFound { category: String, name: String },

    #[error("prompt template '{name}' missing parameters: {missing:?}")]
    MissingPromptParams { name: String, missing: Vec<String> },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to load scenario file {path}: {message}")]
    ScenarioLoad { path: String, message: String },

    #[error("fixture not found: {path}")]
    FixtureNotFound { path: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Mailroom domain operations.
pub type Result<T> = std::result::Result<T, MailroomError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MailroomError::Llm("connection refused".to_string());
        assert!(err.to_string().contains("llm call failed"));

        let err = MailroomError::PromptNotFound {
            category: "notify".to_string(),
            name: "confirmation".to_string(),
        };
        assert!(err.to_string().contains("notify/confirmation"));
    }

    #[test]
    fn test_missing_params_error() {
        let err = MailroomError::MissingPromptParams {
            name: "confirmation".to_string(),
            missing: vec!["order_id".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("confirmation"));
        assert!(msg.contains("order_id"));
    }

    #[test]
    fn test_fixture_not_found() {
        let err = MailroomError::FixtureNotFound {
            path: "fixtures/complete_01.txt".to_string(),
        };
        assert!(err.to_string().contains("fixtures/complete_01.txt"));
    }
}
