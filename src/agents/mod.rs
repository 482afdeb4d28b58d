//! Classification and composition agents.
//!
//! Each agent owns one system prompt and one fallback policy. All of them
//! talk to a hosted model through the shared `Completion` seam; none of them
//! propagate transport failures past their own boundary.

pub mod categorizer;
pub mod composer;
pub mod follow_up;
pub mod translator;

pub use categorizer::{Categorizer, MessageCategory};
pub use composer::ResponseComposer;
pub use follow_up::FollowUpClassifier;
pub use translator::Translator;

use crate::storage::{Message, Role};

/// Render a history window as the `User:`/`Assistant:` transcript the
/// classification and composition prompts expect.
pub fn format_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|msg| {
            let speaker = match msg.role {
                Role::User => "User",
                Role::Assistant => "Assistant",
            };
            format!("{}: {}", speaker, msg.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
