//! Pipeline run state: the accumulator threaded through the stages.
//!
//! Every field a run can produce is declared up front; a stage contributes a
//! sparse [`StageUpdate`] that is merged field-by-field, so stages only touch
//! their own fields without ever seeing an untyped map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::order::ExtractionFields;

/// Terminal status of a pipeline run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TerminalStatus {
    /// Valid order, all fields present, tracked and confirmed.
    Completed,

    /// Valid order with gaps; the sender was asked for the missing fields.
    MissingInfo,

    /// Not a purchase order; no processing beyond classification.
    Skipped,

    /// A collaborator failed; downstream stages passed through.
    Error,
}

impl TerminalStatus {
    /// Token used in scenario files and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminalStatus::Completed => "completed",
            TerminalStatus::MissingInfo => "missing_info",
            TerminalStatus::Skipped => "skipped",
            TerminalStatus::Error => "error",
        }
    }
}

/// Email metadata that seeds a pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailEnvelope {
    pub subject: String,
    pub body: String,
    pub sender: String,
    pub message_id: String,
    pub has_attachment: bool,
}

/// Mutable accumulator owned by exactly one pipeline run.
///
/// Created fresh per invocation and discarded once the evaluation engine has
/// read the outcome; never shared across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineState {
    // --- Input ---
    pub email: EmailEnvelope,
    #[serde(skip)]
    pub document_bytes: Option<Vec<u8>>,

    // --- Classification ---
    pub is_valid_po: bool,
    pub po_id: Option<String>,
    pub classification_reason: Option<String>,

    // --- Extraction ---
    pub raw_ocr_text: Option<String>,
    pub extracted_data: Option<ExtractionFields>,
    pub field_confidences: BTreeMap<String, f32>,
    pub extraction_warnings: Vec<String>,

    // --- Validation ---
    pub validation_errors: Vec<String>,
    pub missing_fields: Vec<String>,

    // --- Side effects ---
    pub sheet_row_added: bool,
    pub confirmation_email_sent: bool,
    pub missing_info_email_sent: bool,

    // --- Run bookkeeping ---
    /// Stage names in real execution order; appended by the executor only.
    pub trajectory: Vec<String>,
    pub final_status: Option<TerminalStatus>,
    pub error_message: Option<String>,
}

impl PipelineState {
    /// Seed a run from an inbound email and optional attachment bytes.
    pub fn from_email(email: EmailEnvelope, document_bytes: Option<Vec<u8>>) -> Self {
        Self {
            email,
            document_bytes,
            ..Default::default()
        }
    }

    /// Whether the fatal marker is set. Once true, every remaining stage is a
    /// trajectory-only no-op.
    pub fn is_fatal(&self) -> bool {
        self.final_status == Some(TerminalStatus::Error)
    }

    /// Merge a sparse stage update into this state, field by field.
    pub fn apply(&mut self, update: StageUpdate) {
        if let Some(v) = update.is_valid_po {
            self.is_valid_po = v;
        }
        if let Some(v) = update.po_id {
            self.po_id = Some(v);
        }
        if let Some(v) = update.classification_reason {
            self.classification_reason = Some(v);
        }
        if let Some(v) = update.document_bytes {
            self.document_bytes = Some(v);
        }
        if let Some(v) = update.raw_ocr_text {
            self.raw_ocr_text = Some(v);
        }
        if let Some(v) = update.extracted_data {
            self.extracted_data = Some(v);
        }
        if let Some(v) = update.field_confidences {
            self.field_confidences = v;
        }
        if let Some(v) = update.extraction_warnings {
            self.extraction_warnings = v;
        }
        if let Some(v) = update.validation_errors {
            self.validation_errors = v;
        }
        if let Some(v) = update.missing_fields {
            self.missing_fields = v;
        }
        if let Some(v) = update.sheet_row_added {
            self.sheet_row_added = v;
        }
        if let Some(v) = update.confirmation_email_sent {
            self.confirmation_email_sent = v;
        }
        if let Some(v) = update.missing_info_email_sent {
            self.missing_info_email_sent = v;
        }
        if let Some(v) = update.final_status {
            self.final_status = Some(v);
        }
        if let Some(v) = update.error_message {
            self.error_message = Some(v);
        }
    }
}

/// Sparse partial state contributed by one stage.
///
/// `None` means "leave the field untouched". Stages never clear fields set by
/// an earlier stage.
#[derive(Debug, Clone, Default)]
pub struct StageUpdate {
    pub is_valid_po: Option<bool>,
    pub po_id: Option<String>,
    pub classification_reason: Option<String>,
    pub document_bytes: Option<Vec<u8>>,
    pub raw_ocr_text: Option<String>,
    pub extracted_data: Option<ExtractionFields>,
    pub field_confidences: Option<BTreeMap<String, f32>>,
    pub extraction_warnings: Option<Vec<String>>,
    pub validation_errors: Option<Vec<String>>,
    pub missing_fields: Option<Vec<String>>,
    pub sheet_row_added: Option<bool>,
    pub confirmation_email_sent: Option<bool>,
    pub missing_info_email_sent: Option<bool>,
    pub final_status: Option<TerminalStatus>,
    pub error_message: Option<String>,
}

impl StageUpdate {
    /// An update that touches nothing (the pass-through update).
    pub fn none() -> Self {
        Self::default()
    }

    /// An update that poisons the run: sets the fatal marker and diagnostic.
    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            final_status: Some(TerminalStatus::Error),
            error_message: Some(message.into()),
            ..Default::default()
        }
    }
}
