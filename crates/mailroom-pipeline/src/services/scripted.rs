//! Deterministic scripted collaborators for hermetic evaluation runs.
//!
//! The evaluation harness replays scenarios with no network access, so the
//! LLM and OCR collaborators are stand-ins that derive their outputs entirely
//! from the prompt text: classification by order-id pattern, extraction by
//! labeled-line parsing, reply generation by echoing the rendered prompt.
//! Identical inputs always produce identical outputs.

use std::collections::BTreeMap;

use async_trait::async_trait;
use regex::Regex;

use mailroom_core::{
    ClassificationResponse, ExtractionFields, ExtractionResponse, MailroomError, Result,
    EXTRACTION_FIELDS,
};

use super::{ChatMessage, ChatRole, LlmService, OcrService};

/// Document labels the scripted extractor recognizes, mapped to canonical
/// field names. Fixtures use these labels.
const FIELD_LABELS: [(&str, &str); 7] = [
    ("Order ID", "order_id"),
    ("Customer", "customer"),
    ("Pickup Location", "pickup_location"),
    ("Delivery Location", "delivery_location"),
    ("Delivery Datetime", "delivery_datetime"),
    ("Driver Name", "driver_name"),
    ("Driver Phone", "driver_phone"),
];

/// Confidence assigned to every field the scripted extractor finds.
const SCRIPTED_CONFIDENCE: f32 = 0.95;

/// Scripted LLM stand-in.
pub struct ScriptedLlm {
    order_id_re: Regex,
    fail_all: bool,
}

impl Default for ScriptedLlm {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self {
            order_id_re: Regex::new(r"PO-\d{4}-\d{3}").expect("valid pattern"),
            fail_all: false,
        }
    }

    /// A scripted LLM that errors on every call (fault injection for tests).
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::new()
        }
    }

    fn user_content<'a>(messages: &'a [ChatMessage]) -> &'a str {
        messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }

    fn check_failure(&self, call: &str) -> Result<()> {
        if self.fail_all {
            return Err(MailroomError::Llm(format!(
                "scripted failure injected on {call}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl LlmService for ScriptedLlm {
    async fn classify(&self, messages: &[ChatMessage]) -> Result<ClassificationResponse> {
        self.check_failure("classify")?;

        let content = Self::user_content(messages);
        let po_id = self
            .order_id_re
            .find(content)
            .map(|m| m.as_str().to_string());
        // The classify prompt renders the attachment flag as its own line.
        let has_attachment = content.contains("Attachment present: true");

        let is_valid_po = has_attachment && po_id.is_some();
        let reason = if is_valid_po {
            format!(
                "order reference {} with document attached",
                po_id.as_deref().unwrap_or_default()
            )
        } else if po_id.is_some() {
            "order reference found but no document attached".to_string()
        } else {
            "no purchase-order reference in subject or body".to_string()
        };

        Ok(ClassificationResponse {
            is_valid_po,
            po_id,
            reason,
        })
    }

    async fn extract(&self, messages: &[ChatMessage]) -> Result<ExtractionResponse> {
        self.check_failure("extract")?;

        let content = Self::user_content(messages);
        let mut data = ExtractionFields::default();
        let mut field_confidences = BTreeMap::new();
        let mut found_any = false;

        for line in content.lines() {
            let Some((label, value)) = line.split_once(':') else {
                continue;
            };
            let label = label.trim();
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            if let Some((_, field)) = FIELD_LABELS.iter().find(|(l, _)| *l == label) {
                data.set(field, value.to_string());
                field_confidences.insert(field.to_string(), SCRIPTED_CONFIDENCE);
                found_any = true;
            }
        }

        if !found_any {
            return Err(MailroomError::Llm(
                "document text contains no recognizable purchase-order fields".to_string(),
            ));
        }

        let warnings = EXTRACTION_FIELDS
            .iter()
            .filter(|f| data.value(f).is_none())
            .map(|f| format!("field '{f}' not found in document"))
            .collect();

        Ok(ExtractionResponse {
            data,
            field_confidences,
            warnings,
        })
    }

    async fn generate_text(&self, messages: &[ChatMessage]) -> Result<String> {
        self.check_failure("generate_text")?;
        // Echo the rendered user prompt: deterministic, and the reply carries
        // exactly the context the notify stage put into it.
        Ok(Self::user_content(messages).to_string())
    }
}

/// Scripted OCR stand-in: fixtures are UTF-8 text documents.
#[derive(Debug, Default)]
pub struct ScriptedOcr;

impl ScriptedOcr {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OcrService for ScriptedOcr {
    async fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        // Unreadable input yields empty text, not an error.
        Ok(String::from_utf8(bytes.to_vec()).unwrap_or_default())
    }
}
