//! End-to-end pipeline runs over scripted collaborators.

use std::sync::Arc;

use mailroom_core::{EmailEnvelope, TerminalStatus};
use mailroom_pipeline::{ActionKind, PipelineBuilder, PipelineConfig, ToolRecorder};

const FULL_DOC: &str = "Order ID: PO-2025-001\n\
Customer: Acme Logistics Ltd.\n\
Pickup Location: Warehouse 4, Rotterdam\n\
Delivery Location: Dock 12, Hamburg\n\
Delivery Datetime: 2025-07-14 09:00\n\
Driver Name: Jan Kowalski\n\
Driver Phone: +48 600 100 200\n";

const PARTIAL_DOC: &str = "Order ID: PO-2025-002\n\
Customer: Baltic Freight GmbH\n\
Pickup Location: Gate 3, Gdansk\n";

fn po_email(message_id: &str, subject: &str) -> EmailEnvelope {
    EmailEnvelope {
        subject: subject.to_string(),
        body: "Please find the order attached.".to_string(),
        sender: "ops@customer.test".to_string(),
        message_id: message_id.to_string(),
        has_attachment: true,
    }
}

#[tokio::test]
async fn test_complete_order_runs_to_completed() {
    let tools = Arc::new(ToolRecorder::new());
    let pipeline = PipelineBuilder::scripted(PipelineConfig::default(), tools.clone())
        .expect("build pipeline");

    let state = pipeline
        .run(
            po_email("msg-1", "Purchase Order PO-2025-001"),
            Some(FULL_DOC.as_bytes().to_vec()),
        )
        .await;

    assert_eq!(state.final_status, Some(TerminalStatus::Completed));
    assert_eq!(
        state.trajectory,
        vec!["classify", "extract", "validate", "track", "notify", "finalize"]
    );
    assert_eq!(state.po_id.as_deref(), Some("PO-2025-001"));
    assert!(state.missing_fields.is_empty());
    assert!(state.sheet_row_added);
    assert!(state.confirmation_email_sent);
    assert!(!state.missing_info_email_sent);

    let rows = tools.rows_appended();
    assert_eq!(rows.len(), 1);
    let values = rows[0].args["values"].as_array().expect("row");
    assert_eq!(values[0].as_str(), Some("PO-2025-001"));
    assert_eq!(values[7].as_str(), Some("complete"));

    let emails = tools.emails_sent();
    assert_eq!(emails.len(), 1);
    let body = emails[0].args["body"].as_str().expect("body");
    assert!(body.contains("PO-2025-001"));
    assert!(body.contains("Acme Logistics Ltd."));
    assert_eq!(emails[0].args["thread_id"].as_str(), Some("msg-1"));
}

#[tokio::test]
async fn test_partial_order_asks_for_missing_fields() {
    let tools = Arc::new(ToolRecorder::new());
    let pipeline = PipelineBuilder::scripted(PipelineConfig::default(), tools.clone())
        .expect("build pipeline");

    let state = pipeline
        .run(
            po_email("msg-2", "PO-2025-002 pickup"),
            Some(PARTIAL_DOC.as_bytes().to_vec()),
        )
        .await;

    assert_eq!(state.final_status, Some(TerminalStatus::MissingInfo));
    assert_eq!(
        state.missing_fields,
        vec![
            "delivery_location",
            "delivery_datetime",
            "driver_name",
            "driver_phone",
        ]
    );
    assert!(state.sheet_row_added);
    assert!(state.missing_info_email_sent);
    assert!(!state.confirmation_email_sent);

    let rows = tools.rows_appended();
    let values = rows[0].args["values"].as_array().expect("row");
    assert_eq!(values[7].as_str(), Some("pending_info"));

    let body = tools.emails_sent()[0].args["body"].as_str().expect("body").to_string();
    assert!(body.contains("driver_phone"));
}

#[tokio::test]
async fn test_non_order_email_is_skipped_without_side_effects() {
    let tools = Arc::new(ToolRecorder::new());
    let pipeline = PipelineBuilder::scripted(PipelineConfig::default(), tools.clone())
        .expect("build pipeline");

    let email = EmailEnvelope {
        subject: "Team offsite agenda".to_string(),
        body: "See you Thursday.".to_string(),
        sender: "hr@customer.test".to_string(),
        message_id: "msg-3".to_string(),
        has_attachment: false,
    };
    let state = pipeline.run(email, None).await;

    assert_eq!(state.final_status, Some(TerminalStatus::Skipped));
    assert_eq!(state.trajectory, vec!["classify", "finalize"]);
    assert!(tools.actions().is_empty());
}

#[tokio::test]
async fn test_unreadable_attachment_ends_in_error_with_full_trajectory() {
    let tools = Arc::new(ToolRecorder::new());
    let pipeline = PipelineBuilder::scripted(PipelineConfig::default(), tools.clone())
        .expect("build pipeline");

    let state = pipeline
        .run(
            po_email("msg-4", "Purchase Order PO-2025-004"),
            Some(vec![0xff, 0xfe, 0x00, 0x9f]),
        )
        .await;

    assert_eq!(state.final_status, Some(TerminalStatus::Error));
    assert_eq!(
        state.trajectory,
        vec!["classify", "extract", "validate", "track", "notify", "finalize"]
    );
    let message = state.error_message.expect("diagnostic");
    assert!(message.starts_with("extract failed:"));
    // Nothing after the failure touched the tools
    assert!(tools.rows_appended().is_empty());
    assert!(tools.emails_sent().is_empty());
}

#[tokio::test]
async fn test_attachment_fetched_when_bytes_not_inline() {
    let tools = Arc::new(ToolRecorder::with_attachment(FULL_DOC.as_bytes().to_vec()));
    let pipeline = PipelineBuilder::scripted(PipelineConfig::default(), tools.clone())
        .expect("build pipeline");

    let state = pipeline
        .run(po_email("msg-5", "Purchase Order PO-2025-001"), None)
        .await;

    assert_eq!(state.final_status, Some(TerminalStatus::Completed));
    let fetches = tools.actions_of_kind(ActionKind::FetchAttachment);
    assert_eq!(fetches.len(), 1);
    assert_eq!(fetches[0].args["message_id"].as_str(), Some("msg-5"));
}

#[tokio::test]
async fn test_identical_runs_are_identical() {
    let make_state = || async {
        let tools = Arc::new(ToolRecorder::new());
        let pipeline = PipelineBuilder::scripted(PipelineConfig::default(), tools)
            .expect("build pipeline");
        pipeline
            .run(
                po_email("msg-6", "Purchase Order PO-2025-001"),
                Some(FULL_DOC.as_bytes().to_vec()),
            )
            .await
    };

    let a = make_state().await;
    let b = make_state().await;
    assert_eq!(a.trajectory, b.trajectory);
    assert_eq!(a.final_status, b.final_status);
    assert_eq!(a.extracted_data, b.extracted_data);
}
