//! Wire types shared by the PR-Connect API service and the content agent.

pub mod api;
pub mod messages;
pub mod models;

/// Whitespace-delimited token count, used for generated releases and transcripts.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
