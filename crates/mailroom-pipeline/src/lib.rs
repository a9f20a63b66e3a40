//! Mailroom Pipeline
//!
//! The six-stage purchase-order pipeline and everything it calls out to:
//! - `Stage` contract and the sequential executor with its single fork
//! - Collaborator service traits (LLM, OCR, tool manager, prompt store)
//! - The `ToolRecorder` mock sink used by tests and the evaluation harness
//! - Deterministic scripted collaborators for hermetic replay
//! - An OpenAI-compatible LLM client for production wiring

pub mod builder;
pub mod config;
pub mod pipeline;
pub mod services;
pub mod stage;
pub mod stages;

// Re-export key types
pub use builder::PipelineBuilder;
pub use config::PipelineConfig;
pub use pipeline::Pipeline;
pub use services::openai::OpenAiLlm;
pub use services::prompts::{PromptStore, PromptTemplate, StaticPromptStore};
pub use services::recorder::{ActionKind, RecordedAction, ToolRecorder};
pub use services::scripted::{ScriptedLlm, ScriptedOcr};
pub use services::{
    ChatMessage, ChatRole, FetchedMessage, LlmService, OcrService, ToolManager, ToolResponse,
    ToolStatus,
};
pub use stage::Stage;
