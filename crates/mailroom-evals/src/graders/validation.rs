//! Missing-field detection scored as set F1.

use std::collections::BTreeSet;

use crate::graders::{Grader, ScoreResult};
use crate::outcome::ActualOutcome;
use crate::scenario::Expectation;

pub struct ValidationCorrectness;

impl Grader for ValidationCorrectness {
    fn name(&self) -> &'static str {
        "validation_correctness"
    }

    fn score(&self, actual: &ActualOutcome, expected: &Expectation) -> ScoreResult {
        let expected_set: BTreeSet<&str> =
            expected.missing_fields.iter().map(String::as_str).collect();
        let actual_set: BTreeSet<&str> =
            actual.missing_fields.iter().map(String::as_str).collect();

        if expected_set.is_empty() && actual_set.is_empty() {
            return ScoreResult::new(self.name(), 1.0, "no missing fields expected or found");
        }

        let overlap = expected_set.intersection(&actual_set).count() as f64;
        let precision = if actual_set.is_empty() {
            if expected_set.is_empty() {
                1.0
            } else {
                0.0
            }
        } else {
            overlap / actual_set.len() as f64
        };
        let recall = if expected_set.is_empty() {
            1.0
        } else {
            overlap / expected_set.len() as f64
        };
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        ScoreResult::new(
            self.name(),
            f1,
            format!(
                "P={precision:.2} R={recall:.2} F1={f1:.2}; expected {expected_set:?}, got {actual_set:?}"
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graders::fixtures;

    fn with_missing(actual: &[&str], expected: &[&str]) -> (ActualOutcome, Expectation) {
        let mut a = fixtures::outcome();
        a.missing_fields = actual.iter().map(|s| s.to_string()).collect();
        let mut e = fixtures::expectation();
        e.missing_fields = expected.iter().map(|s| s.to_string()).collect();
        (a, e)
    }

    #[test]
    fn test_both_empty_scores_one() {
        let (a, e) = with_missing(&[], &[]);
        assert_eq!(ValidationCorrectness.score(&a, &e).value, 1.0);
    }

    #[test]
    fn test_exact_agreement_scores_one() {
        let (a, e) = with_missing(
            &["driver_name", "driver_phone"],
            &["driver_phone", "driver_name"],
        );
        assert_eq!(ValidationCorrectness.score(&a, &e).value, 1.0);
    }

    #[test]
    fn test_false_positive_lowers_precision() {
        let (a, e) = with_missing(&["driver_name", "customer"], &["driver_name"]);
        // P = 0.5, R = 1.0, F1 = 2/3
        let result = ValidationCorrectness.score(&a, &e);
        assert!((result.value - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_nothing_found_when_fields_expected_scores_zero() {
        let (a, e) = with_missing(&[], &["driver_name"]);
        assert_eq!(ValidationCorrectness.score(&a, &e).value, 0.0);
    }

    #[test]
    fn test_disjoint_sets_score_zero() {
        let (a, e) = with_missing(&["customer"], &["driver_name"]);
        assert_eq!(ValidationCorrectness.score(&a, &e).value, 0.0);
    }
}
