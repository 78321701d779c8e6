pub mod dto;
pub mod handler;
pub mod prompt;

use async_trait::async_trait;

use crate::ai::dto::{UserContent, Verdict};

pub use handler::InferenceClient;

/// Judges a piece of user content against a system prompt.
///
/// Implementations never fail: an unreachable or confused model yields a
/// non-violating [`Verdict`] whose reason explains what happened.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, system_prompt: &str, content: &UserContent) -> Verdict;
}
