//! User-facing response generation
//!
//! Turns a status code into the `{status, message}` value handed back to the
//! caller. Messages are fixed per status, with two contextual variants: the
//! CARE message reflects whether the caregiver was actually reached, and
//! ERROR carries the specific contract violation.

use tracing::debug;

use crate::domain::{ClassificationResponse, Status};

/// Context for shaping the message of a response
#[derive(Debug, Clone)]
pub enum ResponseContext {
    /// Outcome of the caregiver notification attempt
    CareDelivery { notified: bool },

    /// Specific validation error to report
    Error { message: String },
}

/// Generates responses for classification outcomes
pub struct ResponseGenerator;

impl ResponseGenerator {
    /// Build the response for a status, shaped by optional context
    pub fn generate(status: Status, context: Option<&ResponseContext>) -> ClassificationResponse {
        debug!(%status, "ResponseGenerator::generate: called");

        let message = match (status, context) {
            (Status::Care, Some(ResponseContext::CareDelivery { notified: false })) => {
                "I understand you need support, but I couldn't reach the caregiver service.".to_string()
            }
            (Status::Error, Some(ResponseContext::Error { message })) => message.clone(),
            _ => default_message(status).to_string(),
        };

        ClassificationResponse::new(status, message)
    }
}

fn default_message(status: Status) -> &'static str {
    match status {
        Status::Next => "Moving forward to the next stage.",
        Status::Previous => "Going back to the previous stage.",
        Status::Exit => "Exiting the task flow.",
        Status::Help => "Help is on the way. What do you need assistance with?",
        Status::Care => "I understand you need support. A caregiver has been notified.",
        Status::Hello => "Hello! How can I help you today?",
        Status::Unknown => "I'm not sure what you mean. Could you rephrase that?",
        Status::Error => "An error occurred while processing your request.",
    }
}
