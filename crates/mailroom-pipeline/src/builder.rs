//! Assembles the six-stage pipeline from a config and injected collaborators.

use std::sync::Arc;

use mailroom_core::{MailroomError, Result};

use crate::config::PipelineConfig;
use crate::pipeline::Pipeline;
use crate::services::openai::OpenAiLlm;
use crate::services::prompts::StaticPromptStore;
use crate::services::scripted::{ScriptedLlm, ScriptedOcr};
use crate::services::{LlmService, OcrService, PromptStore, ToolManager};
use crate::stage::Stage;
use crate::stages::{
    ClassifyStage, ExtractStage, FinalizeStage, NotifyStage, TrackStage, ValidateStage,
};

/// Wires collaborators into the canonical stage order.
///
/// The LLM, OCR, and tool collaborators must be injected; the prompt store
/// defaults to the built-in set.
pub struct PipelineBuilder {
    config: PipelineConfig,
    llm: Option<Arc<dyn LlmService>>,
    ocr: Option<Arc<dyn OcrService>>,
    tools: Option<Arc<dyn ToolManager>>,
    prompts: Arc<dyn PromptStore>,
}

impl PipelineBuilder {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            llm: None,
            ocr: None,
            tools: None,
            prompts: Arc::new(StaticPromptStore::new()),
        }
    }

    pub fn with_llm(mut self, llm: Arc<dyn LlmService>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Production LLM wiring: an OpenAI-compatible client on the configured
    /// model and base url.
    pub fn with_openai_llm(self, api_key: impl Into<String>) -> Self {
        let llm = match &self.config.llm_base_url {
            Some(base) => OpenAiLlm::with_base_url(api_key, &self.config.llm_model, base),
            None => OpenAiLlm::new(api_key, &self.config.llm_model),
        };
        let llm: Arc<dyn LlmService> = Arc::new(llm);
        self.with_llm(llm)
    }

    pub fn with_ocr(mut self, ocr: Arc<dyn OcrService>) -> Self {
        self.ocr = Some(ocr);
        self
    }

    pub fn with_tools(mut self, tools: Arc<dyn ToolManager>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_prompts(mut self, prompts: Arc<dyn PromptStore>) -> Self {
        self.prompts = prompts;
        self
    }

    /// Build the pipeline.
    ///
    /// # Errors
    ///
    /// `Config` when a required collaborator was not injected.
    pub fn build(self) -> Result<Pipeline> {
        let llm = self
            .llm
            .ok_or_else(|| MailroomError::Config("no LLM service injected".to_string()))?;
        let ocr = self
            .ocr
            .ok_or_else(|| MailroomError::Config("no OCR service injected".to_string()))?;
        let tools = self
            .tools
            .ok_or_else(|| MailroomError::Config("no tool manager injected".to_string()))?;

        let stages: Vec<Arc<dyn Stage>> = vec![
            Arc::new(ClassifyStage::new(llm.clone(), self.prompts.clone())),
            Arc::new(ExtractStage::new(
                ocr,
                llm.clone(),
                tools.clone(),
                self.prompts.clone(),
            )),
            Arc::new(ValidateStage::new(self.config.confidence_threshold)),
            Arc::new(TrackStage::new(tools.clone(), self.config.spreadsheet_id)),
            Arc::new(NotifyStage::new(
                llm,
                tools,
                self.prompts,
                self.config.language,
            )),
            Arc::new(FinalizeStage::new()),
        ];
        Ok(Pipeline::new(stages))
    }

    /// A hermetic pipeline over scripted collaborators, sinking all tool
    /// calls into the given recorder-style tool manager.
    pub fn scripted(config: PipelineConfig, tools: Arc<dyn ToolManager>) -> Result<Pipeline> {
        Self::new(config)
            .with_llm(Arc::new(ScriptedLlm::new()))
            .with_ocr(Arc::new(ScriptedOcr::new()))
            .with_tools(tools)
            .build()
    }
}
