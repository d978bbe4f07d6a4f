use std::time::Duration;

use thiserror::Error;

/// Failure talking to the reasoning service.
#[derive(Debug, Error)]
pub enum ReasonerError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reasoning service returned no text")]
    EmptyReply,
    #[error("reasoning service did not answer within {0:?}")]
    Timeout(Duration),
    #[error("reasoning service unavailable: {0}")]
    Unavailable(String),
}

impl ReasonerError {
    /// Whether another attempt could succeed: network errors, timeouts,
    /// 5xx and 429 replies. Other 4xx replies and malformed bodies are final.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout(_) | Self::Unavailable(_) => true,
            Self::Server { status, .. } => *status == 429 || (500..600).contains(status),
            Self::Json(_) | Self::EmptyReply => false,
        }
    }
}

/// Why an evaluation fell back to an `incomplete` decision.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("reasoning service call failed: {0}")]
    Transport(#[from] ReasonerError),
    #[error("reply is not valid JSON: {0}")]
    Parse(serde_json::Error),
    #[error("reply does not match the decision schema: {0}")]
    Schema(serde_json::Error),
    #[error("failed to render the process for the prompt: {0}")]
    Prompt(serde_json::Error),
}

impl ProtocolError {
    /// Short failure class used as a log field.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Parse(_) => "parse",
            Self::Schema(_) => "schema",
            Self::Prompt(_) => "prompt",
        }
    }
}
