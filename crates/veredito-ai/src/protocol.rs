//! Decision protocol: process + corpus → prompt → reasoning service → decision.
//!
//! [`DecisionProtocol::evaluate`] never fails. Every failure past structural
//! validation (transport errors, timeouts, malformed or off-schema replies)
//! resolves to an `incomplete` decision citing the insufficient-documentation
//! policy, and is logged with enough context to diagnose offline.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tracing::{info, warn};
use veredito_core::{Decisao, PolicyCorpus, Processo};

use crate::error::{ProtocolError, ReasonerError};
use crate::prompt::build_prompt;
use crate::reasoner::Reasoner;
use crate::response::parse_decision;

/// Fallback rationale when the reply is not valid JSON.
pub const RATIONALE_INVALID_JSON: &str = "Erro ao processar resposta do LLM - JSON inválido";
/// Fallback rationale for every other failure.
pub const RATIONALE_ANALYSIS_ERROR: &str = "Erro ao analisar o processo";

#[derive(Debug, Clone)]
pub struct ProtocolOptions {
    /// Sampling temperature; kept low for near-deterministic output.
    pub temperature: f32,
    /// Upper bound on in-flight reasoning-service calls.
    pub max_concurrency: usize,
    /// Per-call deadline.
    pub timeout: Duration,
    /// Extra attempts after a transport failure. Parse failures are never retried.
    pub transport_retries: u32,
}

impl Default for ProtocolOptions {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_concurrency: 4,
            timeout: Duration::from_secs(60),
            transport_retries: 1,
        }
    }
}

/// Shared, cloneable evaluator. Clones share the corpus, the reasoner and the
/// concurrency budget.
#[derive(Clone)]
pub struct DecisionProtocol {
    corpus: Arc<PolicyCorpus>,
    reasoner: Arc<dyn Reasoner>,
    options: ProtocolOptions,
    permits: Arc<Semaphore>,
}

impl ProtocolError {
    /// Rationale of the fallback decision for this failure.
    pub fn fallback_rationale(&self) -> &'static str {
        match self {
            Self::Parse(_) => RATIONALE_INVALID_JSON,
            Self::Transport(_) | Self::Schema(_) | Self::Prompt(_) => RATIONALE_ANALYSIS_ERROR,
        }
    }
}

impl DecisionProtocol {
    pub fn new(
        corpus: Arc<PolicyCorpus>,
        reasoner: Arc<dyn Reasoner>,
        options: ProtocolOptions,
    ) -> Self {
        let permits = Arc::new(Semaphore::new(options.max_concurrency.max(1)));
        Self {
            corpus,
            reasoner,
            options,
            permits,
        }
    }

    pub fn corpus(&self) -> &PolicyCorpus {
        &self.corpus
    }

    pub fn options(&self) -> &ProtocolOptions {
        &self.options
    }

    /// Evaluate one process. Always returns a schema-conformant decision.
    pub async fn evaluate(&self, processo: &Processo) -> Decisao {
        let start = Instant::now();

        let decision = match self.try_evaluate(processo).await {
            Ok(decision) => decision,
            Err(err) => {
                warn!(
                    numero_processo = %processo.numero_processo(),
                    class = err.class(),
                    error = %err,
                    "falling back to incomplete decision"
                );
                Decisao::fallback(err.fallback_rationale())
            }
        };

        info!(
            numero_processo = %processo.numero_processo(),
            decision = %decision.decision(),
            citacoes = decision.citacoes().len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "process evaluated"
        );
        decision
    }

    /// Evaluate several processes concurrently, bounded by `max_concurrency`.
    /// Results are in input order.
    pub async fn evaluate_many(&self, processos: &[Processo]) -> Vec<Decisao> {
        futures::future::join_all(processos.iter().map(|p| self.evaluate(p))).await
    }

    async fn try_evaluate(&self, processo: &Processo) -> Result<Decisao, ProtocolError> {
        let prompt = build_prompt(processo, &self.corpus).map_err(ProtocolError::Prompt)?;
        let reply = self.complete_with_retry(&prompt).await?;

        let decision = parse_decision(&reply).inspect_err(|err| {
            warn!(
                model = %self.reasoner.model(),
                class = err.class(),
                error = %err,
                raw = %reply,
                "unusable reply from reasoning service"
            );
        })?;

        Ok(self.known_citations(decision))
    }

    async fn complete_with_retry(&self, prompt: &str) -> Result<String, ReasonerError> {
        let mut attempt = 0;
        loop {
            match self.complete_once(prompt).await {
                Ok(reply) => return Ok(reply),
                Err(err) if err.is_transient() && attempt < self.options.transport_retries => {
                    attempt += 1;
                    warn!(
                        model = %self.reasoner.model(),
                        attempt,
                        error = %err,
                        "reasoning service call failed, retrying"
                    );
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn complete_once(&self, prompt: &str) -> Result<String, ReasonerError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ReasonerError::Unavailable("concurrency limiter closed".into()))?;

        tokio::time::timeout(
            self.options.timeout,
            self.reasoner.complete(prompt, self.options.temperature),
        )
        .await
        .unwrap_or(Err(ReasonerError::Timeout(self.options.timeout)))
    }

    /// Drop citations of codes outside the corpus, and repeated codes.
    fn known_citations(&self, decision: Decisao) -> Decisao {
        let mut kept: Vec<String> = Vec::with_capacity(decision.citacoes().len());
        for code in decision.citacoes() {
            let code = code.trim();
            if !self.corpus.contains(code) {
                warn!(code, "dropping citation of unknown policy");
                continue;
            }
            if !kept.iter().any(|k| k == code) {
                kept.push(code.to_string());
            }
        }
        decision.with_citacoes(kept)
    }
}
