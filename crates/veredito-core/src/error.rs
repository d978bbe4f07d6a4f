use thiserror::Error;

/// Structural rejection of an inbound judicial process.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("missing or blank required field: {0}")]
    MissingField(&'static str),

    #[error("{field} must not be negative (got {value})")]
    NegativeAmount { field: String, value: f64 },

    #[error("{field} must be a finite amount")]
    NonFiniteAmount { field: String },

    #[error("{field} is not a valid timestamp: {value:?}")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("invalid process JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read policy file {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("policy file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("policy corpus is empty")]
    Empty,

    #[error("duplicate policy code: {0}")]
    DuplicateCode(String),

    #[error("policy at position {0} has a blank code or text")]
    BlankEntry(usize),

    #[error("policy corpus lacks the fallback code {0}")]
    MissingFallbackCode(&'static str),
}

#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("decision rationale is blank")]
    BlankRationale,

    #[error("citation code is blank")]
    BlankCitation,
}
