//! Reply quality, scored by a swappable judge.
//!
//! The shipped judge is heuristic: four equally weighted checks over the
//! reply body. The `ReplyJudge` seam exists so a model-backed judge can be
//! dropped in without touching the grader or the engine.

use crate::graders::{Grader, ScoreResult};
use crate::outcome::ActualOutcome;
use crate::scenario::Expectation;

/// Words accepted as confirmation language, including the Spanish forms
/// replies may use.
const CONFIRMATION_WORDS: [&str; 5] =
    ["confirm", "received", "processing", "recibido", "procesando"];

/// Judges a reply body against the scenario's ground truth.
pub trait ReplyJudge: Send + Sync {
    /// Score in [0, 1] plus the checks that passed.
    fn judge(&self, body: &str, expected: &Expectation) -> (f64, Vec<&'static str>);
}

/// Four 0.25-weight checks: length, order id, confirmation language,
/// customer name.
pub struct HeuristicJudge;

impl ReplyJudge for HeuristicJudge {
    fn judge(&self, body: &str, expected: &Expectation) -> (f64, Vec<&'static str>) {
        let mut score = 0.0;
        let mut passed = Vec::new();
        let body_lower = body.to_lowercase();

        if body.len() > 50 {
            score += 0.25;
            passed.push("sufficient_length");
        }

        let order_id = expected
            .extracted_data
            .as_ref()
            .and_then(|data| data.order_id.as_deref());
        if let Some(order_id) = order_id {
            if body.contains(order_id) {
                score += 0.25;
                passed.push("mentions_order_id");
            }
        }

        if CONFIRMATION_WORDS.iter().any(|w| body_lower.contains(w)) {
            score += 0.25;
            passed.push("confirmation_language");
        }

        let customer = expected
            .extracted_data
            .as_ref()
            .and_then(|data| data.customer.as_deref());
        if let Some(customer) = customer {
            if body_lower.contains(&customer.to_lowercase()) {
                score += 0.25;
                passed.push("mentions_customer");
            }
        }

        (score, passed)
    }
}

pub struct EmailQuality {
    judge: Box<dyn ReplyJudge>,
}

impl EmailQuality {
    pub fn new(judge: Box<dyn ReplyJudge>) -> Self {
        Self { judge }
    }
}

impl Grader for EmailQuality {
    fn name(&self) -> &'static str {
        "email_quality"
    }

    fn score(&self, actual: &ActualOutcome, expected: &Expectation) -> ScoreResult {
        // Skipped runs must stay silent; any reply at all is the failure.
        if actual.final_status == "skipped" {
            return match &actual.reply_body {
                None => ScoreResult::new(self.name(), 1.0, "no reply for skipped scenario"),
                Some(_) => ScoreResult::new(self.name(), 0.0, "reply sent for skipped scenario"),
            };
        }

        let Some(body) = &actual.reply_body else {
            return ScoreResult::new(self.name(), 0.0, "no reply sent");
        };

        let (value, passed) = self.judge.judge(body, expected);
        ScoreResult::new(self.name(), value, format!("checks passed: {passed:?}"))
    }
}
