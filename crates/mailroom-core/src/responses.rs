//! Structured-output contracts for the classifier and extractor calls.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::order::ExtractionFields;

/// Classifier verdict for an inbound email.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassificationResponse {
    /// Whether the email carries a genuine purchase order.
    pub is_valid_po: bool,

    /// Order identifier found in the email, if any.
    pub po_id: Option<String>,

    /// Model rationale for the verdict.
    pub reason: String,
}

/// Extractor output for a purchase-order document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExtractionResponse {
    /// Extracted field values (any field may be null).
    pub data: ExtractionFields,

    /// Per-field confidence in 0.0..=1.0, keyed by canonical field name.
    pub field_confidences: BTreeMap<String, f32>,

    /// Non-fatal issues the extractor noticed.
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_response_serde_roundtrip() {
        let resp = ClassificationResponse {
            is_valid_po: true,
            po_id: Some("PO-2025-001".to_string()),
            reason: "subject references a purchase order".to_string(),
        };
        let json = serde_json::to_string(&resp).expect("serialize");
        let back: ClassificationResponse = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(resp, back);
    }

    #[test]
    fn test_classification_response_null_po_id() {
        let json = r#"{"is_valid_po": false, "po_id": null, "reason": "newsletter"}"#;
        let resp: ClassificationResponse = serde_json::from_str(json).expect("deserialize");
        assert!(!resp.is_valid_po);
        assert!(resp.po_id.is_none());
    }

    #[test]
    fn test_extraction_response_defaults_empty() {
        let resp = ExtractionResponse::default();
        assert!(resp.warnings.is_empty());
        assert!(resp.field_confidences.is_empty());
        assert!(resp.data.order_id.is_none());
    }
}
