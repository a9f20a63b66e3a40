//! Prompt templates and the store the stages pull them from.
//!
//! Templates are organized by category and name (`notify/confirmation`) and
//! rendered with handlebars in strict mode; each template declares its
//! required parameters, validated before rendering.

use handlebars::Handlebars;
use serde_json::Value;

use mailroom_core::{MailroomError, Result};

/// A single prompt template with its required parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    pub name: String,
    pub template: String,
    pub params: Vec<String>,
}

impl PromptTemplate {
    pub fn new(name: &str, template: &str, params: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            template: template.to_string(),
            params: params.iter().map(|p| (*p).to_string()).collect(),
        }
    }

    /// Render with the given parameters.
    ///
    /// # Errors
    ///
    /// `MissingPromptParams` when a declared parameter is absent from
    /// `params`; `Config` when the template itself fails to render.
    pub fn render(&self, params: &Value) -> Result<String> {
        let missing: Vec<String> = self
            .params
            .iter()
            .filter(|p| params.get(p.as_str()).is_none())
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(MailroomError::MissingPromptParams {
                name: self.name.clone(),
                missing,
            });
        }

        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry
            .render_template(&self.template, params)
            .map_err(|e| MailroomError::Config(format!("template '{}': {}", self.name, e)))
    }
}

/// Prompt template storage keyed by (category, name).
pub trait PromptStore: Send + Sync {
    /// Get a template by category and name.
    fn get(&self, category: &str, name: &str) -> Option<PromptTemplate>;

    /// Get a template and render it in one call.
    fn get_and_render(&self, category: &str, name: &str, params: &Value) -> Result<String> {
        let template = self
            .get(category, name)
            .ok_or_else(|| MailroomError::PromptNotFound {
                category: category.to_string(),
                name: name.to_string(),
            })?;
        template.render(params)
    }
}

/// Built-in prompt set for the six-stage pipeline.
#[derive(Debug, Default)]
pub struct StaticPromptStore;

impl StaticPromptStore {
    pub fn new() -> Self {
        Self
    }
}

impl PromptStore for StaticPromptStore {
    fn get(&self, category: &str, name: &str) -> Option<PromptTemplate> {
        let template = match (category, name) {
            ("classify", "system") => PromptTemplate::new(
                "classify/system",
                "You triage inbound logistics email. Decide whether the email \
                 carries a genuine purchase order and report the order id if one \
                 is referenced. Answer as JSON with keys is_valid_po, po_id, reason.",
                &[],
            ),
            ("classify", "user") => PromptTemplate::new(
                "classify/user",
                "Subject: {{email_subject}}\nFrom: {{email_sender}}\n\
                 Attachment present: {{has_attachment}}\n\n{{email_body}}",
                &["email_subject", "email_sender", "has_attachment", "email_body"],
            ),
            ("extract", "system") => PromptTemplate::new(
                "extract/system",
                "You extract purchase-order fields from scanned document text. \
                 Answer as JSON with keys data, field_confidences, warnings; any \
                 field you cannot find is null.",
                &[],
            ),
            ("extract", "user") => PromptTemplate::new(
                "extract/user",
                "Document text:\n{{document_text}}",
                &["document_text"],
            ),
            ("notify", "system") => PromptTemplate::new(
                "notify/system",
                "You write short, professional replies to logistics customers on \
                 behalf of the dispatch desk. Reply in {{language}}.",
                &["language"],
            ),
            ("notify", "confirmation") => PromptTemplate::new(
                "notify/confirmation",
                "We have received purchase order {{order_id}} from {{customer}}. \
                 Pickup is scheduled at {{pickup_location}} with delivery to \
                 {{delivery_location}} on {{delivery_datetime}}; driver \
                 {{driver_name}} is assigned. We are processing the order and \
                 will follow up with dispatch details.",
                &[
                    "order_id",
                    "customer",
                    "pickup_location",
                    "delivery_location",
                    "delivery_datetime",
                    "driver_name",
                ],
            ),
            ("notify", "missing_info") => PromptTemplate::new(
                "notify/missing_info",
                "We have received purchase order {{order_id}}, but the following \
                 details are missing: {{missing_fields_description}}. Please \
                 reply with the missing information so we can continue \
                 processing the order.",
                &["order_id", "missing_fields_description"],
            ),
            _ => return None,
        };
        Some(template)
    }
}
