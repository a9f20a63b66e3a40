//! Field-level extraction accuracy.
//!
//! Scores the ratio of correctly extracted fields over the fields the ground
//! truth actually specifies. Comparison is trim + lowercase equality; a
//! semantically equal but differently formatted value (for example a
//! different date rendering) scores 0 for that field. Known limitation.

use mailroom_core::EXTRACTION_FIELDS;

use crate::graders::{Grader, ScoreResult};
use crate::outcome::ActualOutcome;
use crate::scenario::Expectation;

pub struct ExtractionAccuracy;

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

fn field_matches(expected: Option<&str>, actual: Option<&str>) -> Option<bool> {
    match (expected, actual) {
        // Ground truth says nothing about this field
        (None, _) => None,
        (Some(e), Some(a)) => Some(normalize(e) == normalize(a)),
        (Some(_), None) => Some(false),
    }
}

impl Grader for ExtractionAccuracy {
    fn name(&self) -> &'static str {
        "extraction_accuracy"
    }

    fn score(&self, actual: &ActualOutcome, expected: &Expectation) -> ScoreResult {
        let Some(expected_data) = &expected.extracted_data else {
            // Non-PO scenario: any extraction at all is a miss
            return if actual.extracted_data.is_none() {
                ScoreResult::new(self.name(), 1.0, "no extraction expected, none produced")
            } else {
                ScoreResult::new(self.name(), 0.0, "no extraction expected, but data produced")
            };
        };
        let Some(actual_data) = &actual.extracted_data else {
            return ScoreResult::new(self.name(), 0.0, "no data extracted");
        };

        let mut total = 0u32;
        let mut correct = 0u32;
        let mut wrong = Vec::new();
        for field in EXTRACTION_FIELDS {
            match field_matches(expected_data.value(field), actual_data.value(field)) {
                None => {}
                Some(true) => {
                    total += 1;
                    correct += 1;
                }
                Some(false) => {
                    total += 1;
                    wrong.push(field);
                }
            }
        }

        if total == 0 {
            return ScoreResult::new(self.name(), 1.0, "ground truth specifies no fields");
        }
        let value = f64::from(correct) / f64::from(total);
        let reason = if wrong.is_empty() {
            format!("{correct}/{total} fields correct")
        } else {
            format!("{correct}/{total} fields correct; wrong: {}", wrong.join(", "))
        };
        ScoreResult::new(self.name(), value, reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graders::fixtures;

    #[test]
    fn test_perfect_extraction_scores_one() {
        let result = ExtractionAccuracy.score(&fixtures::outcome(), &fixtures::expectation());
        assert_eq!(result.value, 1.0);
    }

    #[test]
    fn test_score_is_exact_ratio() {
        let mut actual = fixtures::outcome();
        if let Some(data) = actual.extracted_data.as_mut() {
            data.driver_name = Some("wrong person".to_string());
            data.driver_phone = None;
        }
        let result = ExtractionAccuracy.score(&actual, &fixtures::expectation());
        assert!((result.value - 5.0 / 7.0).abs() < 1e-9);
        assert!(result.reason.contains("driver_name"));
        assert!(result.reason.contains("driver_phone"));
    }

    #[test]
    fn test_comparison_ignores_case_and_whitespace() {
        let mut actual = fixtures::outcome();
        if let Some(data) = actual.extracted_data.as_mut() {
            data.customer = Some("  ACME LOGISTICS LTD.  ".to_string());
        }
        let result = ExtractionAccuracy.score(&actual, &fixtures::expectation());
        assert_eq!(result.value, 1.0);
    }

    #[test]
    fn test_expected_null_fields_excluded_from_denominator() {
        let mut expected = fixtures::expectation();
        if let Some(data) = expected.extracted_data.as_mut() {
            data.driver_name = None;
            data.driver_phone = None;
        }
        // Actual still has values for those fields; they simply do not count
        let result = ExtractionAccuracy.score(&fixtures::outcome(), &expected);
        assert_eq!(result.value, 1.0);
        assert!(result.reason.contains("5/5"));
    }

    #[test]
    fn test_no_expected_extraction_scores_one() {
        let mut expected = fixtures::expectation();
        expected.extracted_data = None;
        let mut actual = fixtures::outcome();
        actual.extracted_data = None;
        let result = ExtractionAccuracy.score(&actual, &expected);
        assert_eq!(result.value, 1.0);
    }

    #[test]
    fn test_actual_absent_when_expected_present_scores_zero() {
        let mut actual = fixtures::outcome();
        actual.extracted_data = None;
        let result = ExtractionAccuracy.score(&actual, &fixtures::expectation());
        assert_eq!(result.value, 0.0);
    }
}
