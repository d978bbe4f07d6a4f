//! Terminal card for a decision.

use std::fmt::Write;

use veredito_core::{Decisao, DecisionKind, PolicyCorpus};

const RULE_WIDTH: usize = 64;

fn title(kind: DecisionKind) -> &'static str {
    match kind {
        DecisionKind::Approved => "APROVADO",
        DecisionKind::Rejected => "REJEITADO",
        DecisionKind::Incomplete => "INCOMPLETO",
    }
}

fn citation_label(kind: DecisionKind) -> &'static str {
    match kind {
        DecisionKind::Approved => "Políticas Aplicadas",
        DecisionKind::Rejected => "Políticas Violadas",
        DecisionKind::Incomplete => "Motivo",
    }
}

/// Render one decision as a card. Cited codes are listed with their policy
/// text when the corpus knows them.
pub fn render_card(numero_processo: &str, decisao: &Decisao, corpus: &PolicyCorpus) -> String {
    let kind = decisao.decision();
    let mut out = String::new();

    let rule = "─".repeat(RULE_WIDTH);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "  {}  {numero_processo}", title(kind));
    let _ = writeln!(out, "{rule}");

    let _ = writeln!(out, "  {}", decisao.rationale());

    if !decisao.citacoes().is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "  {}:", citation_label(kind));
        for code in decisao.citacoes() {
            match corpus.get(code) {
                Some(policy) => {
                    let _ = writeln!(out, "    {code}  {}", policy.text);
                }
                None => {
                    let _ = writeln!(out, "    {code}");
                }
            }
        }
    }

    out
}
