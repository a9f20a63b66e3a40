//! In-memory tool recorder (testing and evaluation only).
//!
//! `ToolRecorder` satisfies the `ToolManager` contract without any external
//! dependencies: every call appends a `RecordedAction` to an ordered log and
//! returns a canned result. The evaluation engine constructs one recorder per
//! pipeline run so the log at the end of a run reflects only that run.

use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use mailroom_core::Result;

use super::{FetchedMessage, ToolManager, ToolResponse};

/// Kind of a recorded side-effecting action.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    SendEmail,
    AppendRow,
    FetchAttachment,
    FetchMessage,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::SendEmail => "send_email",
            ActionKind::AppendRow => "append_row",
            ActionKind::FetchAttachment => "fetch_attachment",
            ActionKind::FetchMessage => "fetch_message",
        }
    }
}

/// One outbound action captured by the recorder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordedAction {
    pub kind: ActionKind,
    pub args: serde_json::Value,
}

/// Inspectable mock `ToolManager` backed by a `Mutex<Vec<RecordedAction>>`.
#[derive(Debug, Default)]
pub struct ToolRecorder {
    calls: Mutex<Vec<RecordedAction>>,
    canned_attachment: Vec<u8>,
    canned_message: FetchedMessage,
}

impl ToolRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorder whose `fetch_attachment` returns the given bytes.
    pub fn with_attachment(bytes: Vec<u8>) -> Self {
        Self {
            canned_attachment: bytes,
            ..Default::default()
        }
    }

    /// Override the canned `fetch_message` result.
    pub fn with_message(mut self, message: FetchedMessage) -> Self {
        self.canned_message = message;
        self
    }

    fn record(&self, kind: ActionKind, args: serde_json::Value) {
        let mut calls = self.calls.lock().unwrap();
        calls.push(RecordedAction { kind, args });
    }

    /// Full unfiltered action log, in call order.
    pub fn actions(&self) -> Vec<RecordedAction> {
        self.calls.lock().unwrap().clone()
    }

    /// Actions of one kind, in call order.
    pub fn actions_of_kind(&self, kind: ActionKind) -> Vec<RecordedAction> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.kind == kind)
            .cloned()
            .collect()
    }

    /// All send-email actions.
    pub fn emails_sent(&self) -> Vec<RecordedAction> {
        self.actions_of_kind(ActionKind::SendEmail)
    }

    /// All append-row actions.
    pub fn rows_appended(&self) -> Vec<RecordedAction> {
        self.actions_of_kind(ActionKind::AppendRow)
    }

    /// Clear the log without reconstructing the recorder.
    pub fn reset(&self) {
        self.calls.lock().unwrap().clear();
    }
}

#[async_trait]
impl ToolManager for ToolRecorder {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        thread_id: Option<&str>,
    ) -> Result<ToolResponse> {
        self.record(
            ActionKind::SendEmail,
            json!({
                "to": to,
                "subject": subject,
                "body": body,
                "thread_id": thread_id,
            }),
        );
        Ok(ToolResponse::ok())
    }

    async fn append_row(&self, sheet_id: &str, values: &[String]) -> Result<ToolResponse> {
        self.record(
            ActionKind::AppendRow,
            json!({
                "sheet_id": sheet_id,
                "values": values,
            }),
        );
        Ok(ToolResponse::ok())
    }

    async fn fetch_attachment(&self, message_id: &str, attachment_id: &str) -> Result<Vec<u8>> {
        self.record(
            ActionKind::FetchAttachment,
            json!({
                "message_id": message_id,
                "attachment_id": attachment_id,
            }),
        );
        Ok(self.canned_attachment.clone())
    }

    async fn fetch_message(&self, message_id: &str) -> Result<FetchedMessage> {
        self.record(
            ActionKind::FetchMessage,
            json!({ "message_id": message_id }),
        );
        Ok(self.canned_message.clone())
    }
}
