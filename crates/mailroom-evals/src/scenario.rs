//! Scenario files: one JSON document per evaluation case.
//!
//! A scenario is input plus ground truth and nothing else; how the pipeline
//! gets from one to the other is not the scenario's business. Loaded once,
//! never mutated.

use serde::{Deserialize, Serialize};

use mailroom_core::{EmailEnvelope, ExtractionFields};

/// One evaluation case.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Unique id, also the conventional file stem.
    pub id: String,

    /// Grouping label for per-category breakdowns
    /// (`happy_path`, `not_a_po`, `missing_fields`, `error`).
    pub category: String,

    pub input: ScenarioInput,
    pub expected: Expectation,
}

/// The inbound email plus an optional document fixture.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioInput {
    pub email_subject: String,
    pub email_body: String,
    pub email_sender: String,
    pub email_message_id: String,
    pub has_attachment: bool,

    /// Path of the attachment fixture, relative to the fixtures dir. Read
    /// fresh on every run; the loader only checks it exists.
    #[serde(default)]
    pub fixture: Option<String>,
}

impl ScenarioInput {
    pub fn envelope(&self) -> EmailEnvelope {
        EmailEnvelope {
            subject: self.email_subject.clone(),
            body: self.email_body.clone(),
            sender: self.email_sender.clone(),
            message_id: self.email_message_id.clone(),
            has_attachment: self.has_attachment,
        }
    }
}

/// Ground truth the graders compare the run against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expectation {
    pub is_valid_po: bool,

    /// Expected field values; `None` entries are excluded from the extraction
    /// score denominator. Absent entirely for non-PO scenarios.
    #[serde(default)]
    pub extracted_data: Option<ExtractionFields>,

    /// Exact stage-name sequence the run must produce.
    pub trajectory: Vec<String>,

    #[serde(default)]
    pub missing_fields: Vec<String>,

    /// Terminal status token: completed | missing_info | skipped | error.
    pub final_status: String,

    #[serde(default)]
    pub sheet_row_added: bool,
    #[serde(default)]
    pub confirmation_email_sent: bool,
    #[serde(default)]
    pub missing_info_email_sent: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_parses_minimal_document() {
        let scenario: Scenario = serde_json::from_str(
            r#"{
                "id": "not_a_po_newsletter",
                "category": "not_a_po",
                "input": {
                    "email_subject": "Weekly digest",
                    "email_body": "News inside.",
                    "email_sender": "news@list.test",
                    "email_message_id": "msg-n1",
                    "has_attachment": false
                },
                "expected": {
                    "is_valid_po": false,
                    "trajectory": ["classify", "finalize"],
                    "final_status": "skipped"
                }
            }"#,
        )
        .expect("parse");

        assert_eq!(scenario.id, "not_a_po_newsletter");
        assert!(scenario.input.fixture.is_none());
        assert!(scenario.expected.extracted_data.is_none());
        assert!(!scenario.expected.sheet_row_added);
    }

    #[test]
    fn test_scenario_rejects_missing_expectation() {
        let result = serde_json::from_str::<Scenario>(
            r#"{"id": "x", "category": "y", "input": {
                "email_subject": "s", "email_body": "b", "email_sender": "e",
                "email_message_id": "m", "has_attachment": false
            }}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_envelope_mirrors_input() {
        let input = ScenarioInput {
            email_subject: "PO-2025-001".to_string(),
            email_body: "attached".to_string(),
            email_sender: "ops@acme.test".to_string(),
            email_message_id: "msg-1".to_string(),
            has_attachment: true,
            fixture: Some("full_order.txt".to_string()),
        };
        let envelope = input.envelope();
        assert_eq!(envelope.subject, "PO-2025-001");
        assert!(envelope.has_attachment);
    }
}
