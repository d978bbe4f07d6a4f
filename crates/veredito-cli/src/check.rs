//! `veredito check`: evaluate processes from a JSON file.

use std::path::Path;

use anyhow::{Context, bail};
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use veredito_ai::DecisionProtocol;
use veredito_core::{Decisao, Processo};

use crate::display;

#[derive(Serialize)]
struct Verdict<'a> {
    #[serde(rename = "numeroProcesso")]
    numero_processo: &'a str,
    #[serde(flatten)]
    decisao: &'a Decisao,
}

/// Read a file holding one process object or an array of them.
pub fn load_processos(path: &Path) -> anyhow::Result<Vec<Processo>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let value: Value =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;

    match value {
        Value::Array(items) => {
            if items.is_empty() {
                bail!("{} holds an empty array", path.display());
            }
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| {
                    Processo::validate(item).with_context(|| format!("process at index {i}"))
                })
                .collect()
        }
        obj @ Value::Object(_) => Ok(vec![
            Processo::validate(obj).with_context(|| format!("process in {}", path.display()))?,
        ]),
        _ => bail!(
            "{} must hold a process object or an array of them",
            path.display()
        ),
    }
}

pub async fn run(path: &Path, json: bool, protocol: &DecisionProtocol) -> anyhow::Result<()> {
    let processos = load_processos(path)?;
    info!(path = %path.display(), count = processos.len(), "evaluating processes");

    let decisoes = protocol.evaluate_many(&processos).await;

    if json {
        let verdicts: Vec<Verdict<'_>> = processos
            .iter()
            .zip(&decisoes)
            .map(|(p, d)| Verdict {
                numero_processo: p.numero_processo(),
                decisao: d,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&verdicts)?);
    } else {
        for (p, d) in processos.iter().zip(&decisoes) {
            print!(
                "{}",
                display::render_card(p.numero_processo(), d, protocol.corpus())
            );
            println!();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn processo(numero: &str) -> Value {
        json!({
            "numeroProcesso": numero,
            "classe": "Cumprimento de Sentença contra a Fazenda Pública",
            "orgaoJulgador": "1ª VARA FEDERAL",
            "ultimaDistribuicao": "2024-01-15T10:30:00Z",
            "assunto": "Benefício previdenciário",
            "segredoJustica": false,
            "justicaGratuita": true,
            "siglaTribunal": "TRF5",
            "esfera": "Federal"
        })
    }

    fn write(value: &Value) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(value.to_string().as_bytes()).unwrap();
        f
    }

    #[test]
    fn single_object() {
        let f = write(&processo("0001"));
        let list = load_processos(f.path()).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].numero_processo(), "0001");
    }

    #[test]
    fn array_keeps_order() {
        let f = write(&json!([processo("0001"), processo("0002")]));
        let list = load_processos(f.path()).unwrap();
        let numeros: Vec<_> = list.iter().map(|p| p.numero_processo()).collect();
        assert_eq!(numeros, ["0001", "0002"]);
    }

    #[test]
    fn invalid_entry_names_its_index() {
        let mut bad = processo("0002");
        bad.as_object_mut().unwrap().remove("classe");
        let f = write(&json!([processo("0001"), bad]));

        let err = load_processos(f.path()).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("index 1"), "{chain}");
        assert!(chain.contains("classe"), "{chain}");
    }

    #[test]
    fn scalars_and_empty_arrays_are_rejected() {
        assert!(load_processos(write(&json!(42)).path()).is_err());
        assert!(load_processos(write(&json!([])).path()).is_err());
    }

    #[test]
    fn verdict_flattens_decision() {
        let d = Decisao::fallback("Erro ao analisar o processo");
        let v = serde_json::to_value(Verdict {
            numero_processo: "0001",
            decisao: &d,
        })
        .unwrap();
        assert_eq!(
            v,
            json!({
                "numeroProcesso": "0001",
                "decision": "incomplete",
                "rationale": "Erro ao analisar o processo",
                "citacoes": ["POL-8"]
            })
        );
    }
}
