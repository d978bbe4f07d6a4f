pub mod decision;
pub mod error;
pub mod policy;
pub mod processo;
mod timestamp;

pub use decision::{Decisao, DecisionKind};
pub use error::{CorpusError, DecisionError, ValidationError};
pub use policy::{FALLBACK_POLICY_CODE, Policy, PolicyCorpus};
pub use processo::{
    DocumentoEstruturado, DocumentosEstruturados, Esfera, Honorarios, Movimento, Processo,
};
