use async_trait::async_trait;

use crate::error::ReasonerError;

/// A text-completion capability: prompt in, free-form reply out.
///
/// The decision protocol only ever talks to this trait, so the production
/// client can be swapped for a deterministic fake in tests.
#[async_trait]
pub trait Reasoner: Send + Sync {
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, ReasonerError>;

    /// Model identifier for logs.
    fn model(&self) -> &str;
}
