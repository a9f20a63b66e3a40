//! Mailroom Core
//!
//! Canonical definitions for the domain entities:
//! - `PurchaseOrder`: the structured document extracted from an attachment
//! - `PipelineState`: the accumulator threaded through one pipeline run
//! - `StageUpdate`: the sparse partial record a stage contributes
//! - Collaborator response contracts for the classifier and extractor calls

pub mod error;
pub mod order;
pub mod responses;
pub mod state;

// Re-export main types and errors
pub use error::{MailroomError, Result};
pub use order::{ExtractionFields, PurchaseOrder, EXTRACTION_FIELDS};
pub use responses::{ClassificationResponse, ExtractionResponse};
pub use state::{EmailEnvelope, PipelineState, StageUpdate, TerminalStatus};
