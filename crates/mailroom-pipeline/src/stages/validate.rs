//! Validation stage: checks extracted fields for completeness and confidence.

use async_trait::async_trait;
use tracing::debug;

use mailroom_core::{PipelineState, StageUpdate, EXTRACTION_FIELDS};

use crate::stage::Stage;

pub struct ValidateStage {
    confidence_threshold: f32,
}

impl ValidateStage {
    pub fn new(confidence_threshold: f32) -> Self {
        Self {
            confidence_threshold,
        }
    }
}

#[async_trait]
impl Stage for ValidateStage {
    fn name(&self) -> &'static str {
        "validate"
    }

    async fn execute(&self, state: &PipelineState) -> StageUpdate {
        let mut missing = Vec::new();
        let mut errors = Vec::new();

        for field in EXTRACTION_FIELDS {
            let value = state
                .extracted_data
                .as_ref()
                .and_then(|data| data.value(field));
            match value {
                None => missing.push(field.to_string()),
                Some(_) => {
                    let confidence = state
                        .field_confidences
                        .get(field)
                        .copied()
                        .unwrap_or(0.0);
                    if confidence < self.confidence_threshold {
                        errors.push(format!(
                            "low confidence for {field}: {confidence:.2} below {:.2}",
                            self.confidence_threshold
                        ));
                        missing.push(field.to_string());
                    }
                }
            }
        }

        debug!(
            missing = missing.len(),
            errors = errors.len(),
            "validation complete"
        );

        StageUpdate {
            missing_fields: Some(missing),
            validation_errors: Some(errors),
            ..Default::default()
        }
    }
}
