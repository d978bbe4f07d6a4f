//! In-memory reasoners for tests.
//!
//! Provides `ScriptedReasoner` and `FailingReasoner`, which satisfy the
//! [`Reasoner`] contract without any network access.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::ReasonerError;
use crate::reasoner::Reasoner;

const FAKE_MODEL: &str = "fake";

// ---------------------------------------------------------------------------
// ScriptedReasoner
// ---------------------------------------------------------------------------

/// Replays a queue of canned outcomes, one per call, and records every prompt.
///
/// When the queue is empty the last successful reply is repeated; with no
/// reply at all the call fails as unavailable.
#[derive(Debug, Default)]
pub struct ScriptedReasoner {
    script: Mutex<VecDeque<Result<String, String>>>,
    last_reply: Mutex<Option<String>>,
    prompts: Mutex<Vec<(String, f32)>>,
    calls: AtomicUsize,
}

impl ScriptedReasoner {
    pub fn new() -> Self {
        Self::default()
    }

    /// A reasoner that always answers `reply`.
    pub fn always(reply: impl Into<String>) -> Self {
        Self::new().then_reply(reply)
    }

    /// Queue a successful reply.
    pub fn then_reply(self, reply: impl Into<String>) -> Self {
        lock(&self.script).push_back(Ok(reply.into()));
        self
    }

    /// Queue a transport-level failure.
    pub fn then_fail(self, message: impl Into<String>) -> Self {
        lock(&self.script).push_back(Err(message.into()));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, with the sampling temperature of each call.
    pub fn prompts(&self) -> Vec<(String, f32)> {
        lock(&self.prompts).clone()
    }
}

#[async_trait]
impl Reasoner for ScriptedReasoner {
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, ReasonerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.prompts).push((prompt.to_string(), temperature));

        let next = lock(&self.script).pop_front();
        match next {
            Some(Ok(reply)) => {
                *lock(&self.last_reply) = Some(reply.clone());
                Ok(reply)
            }
            Some(Err(message)) => Err(ReasonerError::Unavailable(message)),
            None => lock(&self.last_reply)
                .clone()
                .ok_or_else(|| ReasonerError::Unavailable("script exhausted".into())),
        }
    }

    fn model(&self) -> &str {
        FAKE_MODEL
    }
}

// ---------------------------------------------------------------------------
// FailingReasoner
// ---------------------------------------------------------------------------

/// Every call fails with a transport error.
#[derive(Debug, Default)]
pub struct FailingReasoner {
    calls: AtomicUsize,
}

impl FailingReasoner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Reasoner for FailingReasoner {
    async fn complete(&self, _prompt: &str, _temperature: f32) -> Result<String, ReasonerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ReasonerError::Unavailable("connection refused".into()))
    }

    fn model(&self) -> &str {
        FAKE_MODEL
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_replays_in_order_then_repeats() {
        let r = ScriptedReasoner::new()
            .then_fail("boom")
            .then_reply("a")
            .then_reply("b");

        assert!(matches!(
            r.complete("p1", 0.1).await,
            Err(ReasonerError::Unavailable(_))
        ));
        assert_eq!(r.complete("p2", 0.1).await.unwrap(), "a");
        assert_eq!(r.complete("p3", 0.1).await.unwrap(), "b");
        assert_eq!(r.complete("p4", 0.1).await.unwrap(), "b");
        assert_eq!(r.calls(), 4);
        assert_eq!(r.prompts()[1], ("p2".to_string(), 0.1));
    }

    #[tokio::test]
    async fn empty_script_is_unavailable() {
        let r = ScriptedReasoner::new();
        assert!(r.complete("p", 0.0).await.is_err());
    }

    #[tokio::test]
    async fn failing_counts_calls() {
        let r = FailingReasoner::new();
        assert!(r.complete("p", 0.0).await.is_err());
        assert!(r.complete("p", 0.0).await.is_err());
        assert_eq!(r.calls(), 2);
    }
}
