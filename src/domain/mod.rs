//! Domain types for the stage-navigation classifier
//!
//! Core types: Intent, Status, Stage, TaskContext, ClassificationResponse.
//! All are constructed per classification call and never mutated.

mod intent;
mod models;

pub use intent::{Intent, Status};
pub use models::{ClassificationResponse, IntentReply, Stage, TaskContext};
