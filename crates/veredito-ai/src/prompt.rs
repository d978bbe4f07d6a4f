use veredito_core::{PolicyCorpus, Processo};

// ── Prompt template ──

/// Build the single prompt sent to the reasoning service.
///
/// Deterministic for a given process and corpus: the process is embedded in
/// its canonical JSON form and the corpus in its stable text rendering.
pub fn build_prompt(
    processo: &Processo,
    corpus: &PolicyCorpus,
) -> Result<String, serde_json::Error> {
    let processo = processo.to_canonical_json()?;
    let politicas = corpus.render_as_text();

    Ok(format!(
        "Você é um analisador de processos judiciais. \
         Analise o processo abaixo conforme as políticas da empresa.\n\
         \n\
         POLÍTICAS:\n\
         {politicas}\n\
         \n\
         PROCESSO:\n\
         {processo}\n\
         \n\
         INSTRUÇÕES:\n\
         1. Verifique cada política contra os dados do processo\n\
         2. Retorne APENAS um JSON válido (sem markdown, sem explicações extras)\n\
         3. Os campos são:\n\
         - decision: \"approved\", \"rejected\" ou \"incomplete\"\n\
         - rationale: justificativa clara e concisa\n\
         - citacoes: array com IDs das políticas relevantes\n\
         \n\
         IMPORTANTE: Retorne SOMENTE o JSON, começando com {{ e terminando com }}\n\
         \n\
         JSON:"
    ))
}
