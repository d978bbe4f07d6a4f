//! Decision protocol: turns a validated process and the policy corpus into a
//! decision by delegating the judgment to an external reasoning service.

mod error;
pub mod fakes;
mod gemini;
mod prompt;
mod protocol;
mod reasoner;
mod response;

pub use error::{ProtocolError, ReasonerError};
pub use gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiReasoner};
pub use prompt::build_prompt;
pub use protocol::{
    DecisionProtocol, ProtocolOptions, RATIONALE_ANALYSIS_ERROR, RATIONALE_INVALID_JSON,
};
pub use reasoner::Reasoner;
pub use response::{parse_decision, strip_fences};
