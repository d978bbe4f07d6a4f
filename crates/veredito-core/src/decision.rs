//! Decision value returned for every evaluated process.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::DecisionError;
use crate::policy::FALLBACK_POLICY_CODE;

/// Outcome of an evaluation. The wire literals are exact and lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionKind {
    Approved,
    Rejected,
    Incomplete,
}

impl DecisionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Incomplete => "incomplete",
        }
    }
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision with rationale and the policy codes that drove it.
///
/// Deserialization validates the shape: `decision` must be one of the three
/// literals, `rationale` must not be blank and `citacoes` must be present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DecisaoRaw")]
pub struct Decisao {
    decision: DecisionKind,
    rationale: String,
    citacoes: Vec<String>,
}

impl Decisao {
    pub fn new(
        decision: DecisionKind,
        rationale: impl Into<String>,
        citacoes: Vec<String>,
    ) -> Result<Self, DecisionError> {
        let rationale = rationale.into();
        if rationale.trim().is_empty() {
            return Err(DecisionError::BlankRationale);
        }
        if citacoes.iter().any(|c| c.trim().is_empty()) {
            return Err(DecisionError::BlankCitation);
        }
        Ok(Self {
            decision,
            rationale,
            citacoes,
        })
    }

    /// `incomplete` decision citing the insufficient-documentation policy.
    pub fn fallback(rationale: &'static str) -> Self {
        debug_assert!(!rationale.trim().is_empty());
        Self {
            decision: DecisionKind::Incomplete,
            rationale: rationale.to_string(),
            citacoes: vec![FALLBACK_POLICY_CODE.to_string()],
        }
    }

    /// Same decision with a different citation list.
    pub fn with_citacoes(self, citacoes: Vec<String>) -> Self {
        Self { citacoes, ..self }
    }

    pub fn decision(&self) -> DecisionKind {
        self.decision
    }

    pub fn rationale(&self) -> &str {
        &self.rationale
    }

    pub fn citacoes(&self) -> &[String] {
        &self.citacoes
    }
}

#[derive(Deserialize)]
struct DecisaoRaw {
    decision: DecisionKind,
    rationale: String,
    citacoes: Vec<String>,
}

impl TryFrom<DecisaoRaw> for Decisao {
    type Error = DecisionError;

    fn try_from(raw: DecisaoRaw) -> Result<Self, Self::Error> {
        let before = raw.citacoes.len();
        let citacoes: Vec<String> = raw
            .citacoes
            .into_iter()
            .filter(|c| !c.trim().is_empty())
            .collect();
        if citacoes.len() < before {
            warn!(dropped = before - citacoes.len(), "dropping blank citation codes");
        }
        Self::new(raw.decision, raw.rationale, citacoes)
    }
}
