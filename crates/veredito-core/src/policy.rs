//! Credit-purchase policy corpus.
//!
//! Loaded once at startup and shared read-only by every evaluation. The text
//! rendering produced by [`PolicyCorpus::render_as_text`] is embedded verbatim
//! in prompts, so it must not change for the lifetime of the process.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::CorpusError;

/// Policy cited when a decision falls back to `incomplete`.
pub const FALLBACK_POLICY_CODE: &str = "POL-8";

const BUILTIN: &[(&str, &str)] = &[
    (
        "POL-1",
        "Apenas processos transitados em julgado e em fase de execução",
    ),
    ("POL-2", "O valor de condenação deve ser informado"),
    ("POL-3", "Valor mínimo de condenação de R$ 1.000,00"),
    ("POL-4", "Não adquirir condenações na esfera trabalhista"),
    (
        "POL-5",
        "Não adquirir processos com óbito do autor sem habilitação no inventário",
    ),
    (
        "POL-6",
        "Não adquirir processos com substabelecimento sem reserva de poderes",
    ),
    (
        "POL-7",
        "Honorários contratuais, periciais e sucumbenciais devem ser informados quando existirem",
    ),
    (
        FALLBACK_POLICY_CODE,
        "Documentos essenciais são obrigatórios; na falta deles o processo é incompleto",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub code: String,
    pub text: String,
}

/// Ordered set of policies with unique codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyCorpus {
    policies: Vec<Policy>,
}

impl PolicyCorpus {
    /// The eight built-in policies, POL-1 through POL-8.
    pub fn builtin() -> Self {
        Self {
            policies: BUILTIN
                .iter()
                .map(|(code, text)| Policy {
                    code: code.to_string(),
                    text: text.to_string(),
                })
                .collect(),
        }
    }

    /// Load the corpus from `path` when given, otherwise use the built-in set.
    pub fn load(path: Option<&Path>) -> Result<Self, CorpusError> {
        let corpus = match path {
            Some(p) => Self::from_json_file(p)?,
            None => Self::builtin(),
        };
        info!(
            policies = corpus.len(),
            source = %path.map(|p| p.display().to_string()).unwrap_or_else(|| "builtin".into()),
            "loaded policy corpus"
        );
        Ok(corpus)
    }

    /// Read a JSON array of `{"code": .., "text": ..}` objects.
    pub fn from_json_file(path: &Path) -> Result<Self, CorpusError> {
        let bytes = std::fs::read(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let policies: Vec<Policy> = serde_json::from_slice(&bytes)?;
        Self::from_policies(policies)
    }

    /// Build a corpus, checking codes are unique and non-blank and that the
    /// fallback code is present.
    pub fn from_policies(policies: Vec<Policy>) -> Result<Self, CorpusError> {
        if policies.is_empty() {
            return Err(CorpusError::Empty);
        }

        let mut seen = HashSet::new();
        for (i, p) in policies.iter().enumerate() {
            if p.code.trim().is_empty() || p.text.trim().is_empty() {
                return Err(CorpusError::BlankEntry(i));
            }
            if !seen.insert(p.code.as_str()) {
                return Err(CorpusError::DuplicateCode(p.code.clone()));
            }
        }
        if !seen.contains(FALLBACK_POLICY_CODE) {
            return Err(CorpusError::MissingFallbackCode(FALLBACK_POLICY_CODE));
        }

        Ok(Self { policies })
    }

    /// One `CODE: text` line per policy, in corpus order.
    pub fn render_as_text(&self) -> String {
        self.policies
            .iter()
            .map(|p| format!("{}: {}", p.code, p.text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn get(&self, code: &str) -> Option<&Policy> {
        self.policies.iter().find(|p| p.code == code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.policies.iter().map(|p| p.code.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Policy> {
        self.policies.iter()
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn policy(code: &str, text: &str) -> Policy {
        Policy {
            code: code.into(),
            text: text.into(),
        }
    }

    #[test]
    fn builtin_has_eight_ordered_codes() {
        let corpus = PolicyCorpus::builtin();
        let codes: Vec<&str> = corpus.codes().collect();
        assert_eq!(
            codes,
            vec!["POL-1", "POL-2", "POL-3", "POL-4", "POL-5", "POL-6", "POL-7", "POL-8"]
        );
        assert!(corpus.contains(FALLBACK_POLICY_CODE));
        assert!(!corpus.contains("POL-9"));
    }

    #[test]
    fn builtin_passes_its_own_validation() {
        let corpus = PolicyCorpus::builtin();
        let rebuilt = PolicyCorpus::from_policies(corpus.iter().cloned().collect()).unwrap();
        assert_eq!(corpus, rebuilt);
    }

    #[test]
    fn rendering_is_one_line_per_policy() {
        let corpus = PolicyCorpus::builtin();
        let text = corpus.render_as_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert!(lines[0].starts_with("POL-1: "));
        assert!(lines[7].starts_with("POL-8: "));
        assert_eq!(text, corpus.render_as_text());
    }

    #[test]
    fn duplicate_code_rejected() {
        let err = PolicyCorpus::from_policies(vec![
            policy("POL-8", "a"),
            policy("POL-8", "b"),
        ])
        .unwrap_err();
        assert!(matches!(err, CorpusError::DuplicateCode(ref c) if c == "POL-8"));
    }

    #[test]
    fn blank_entry_rejected() {
        let err = PolicyCorpus::from_policies(vec![policy("POL-8", "ok"), policy(" ", "x")])
            .unwrap_err();
        assert!(matches!(err, CorpusError::BlankEntry(1)));
    }

    #[test]
    fn empty_and_missing_fallback_rejected() {
        assert!(matches!(
            PolicyCorpus::from_policies(vec![]),
            Err(CorpusError::Empty)
        ));
        assert!(matches!(
            PolicyCorpus::from_policies(vec![policy("POL-1", "x")]),
            Err(CorpusError::MissingFallbackCode(_))
        ));
    }

    #[test]
    fn loads_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"code":"POL-1","text":"Primeira"}},{{"code":"POL-8","text":"Documentos"}}]"#
        )
        .unwrap();

        let corpus = PolicyCorpus::load(Some(file.path())).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.render_as_text(), "POL-1: Primeira\nPOL-8: Documentos");
        assert_eq!(corpus.get("POL-1").unwrap().text, "Primeira");
    }

    #[test]
    fn missing_file_errors() {
        let err = PolicyCorpus::load(Some(Path::new("/nonexistent/policies.json"))).unwrap_err();
        assert!(matches!(err, CorpusError::Io { .. }));
    }

    #[test]
    fn malformed_file_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = PolicyCorpus::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, CorpusError::Json(_)));
    }

    #[test]
    fn load_without_path_uses_builtin() {
        assert_eq!(PolicyCorpus::load(None).unwrap(), PolicyCorpus::builtin());
    }
}
