//! Binary classification check: did the run agree the email is an order?

use crate::graders::{Grader, ScoreResult};
use crate::outcome::ActualOutcome;
use crate::scenario::Expectation;

pub struct ClassificationAccuracy;

impl Grader for ClassificationAccuracy {
    fn name(&self) -> &'static str {
        "classification_accuracy"
    }

    fn score(&self, actual: &ActualOutcome, expected: &Expectation) -> ScoreResult {
        if actual.is_valid_po == expected.is_valid_po {
            ScoreResult::new(self.name(), 1.0, "verdict matches")
        } else {
            ScoreResult::new(
                self.name(),
                0.0,
                format!(
                    "expected is_valid_po={}, got {}",
                    expected.is_valid_po, actual.is_valid_po
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graders::fixtures;

    #[test]
    fn test_matching_verdict_scores_one() {
        let result = ClassificationAccuracy.score(&fixtures::outcome(), &fixtures::expectation());
        assert_eq!(result.value, 1.0);
    }

    #[test]
    fn test_mismatched_verdict_scores_zero() {
        let mut actual = fixtures::outcome();
        actual.is_valid_po = false;
        let result = ClassificationAccuracy.score(&actual, &fixtures::expectation());
        assert_eq!(result.value, 0.0);
        assert!(result.reason.contains("expected is_valid_po=true"));
    }
}
