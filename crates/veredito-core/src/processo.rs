//! Judicial process snapshot submitted for credit-purchase analysis.
//!
//! A [`Processo`] can only be obtained through validation: either
//! [`Processo::validate`], [`Processo::from_json_str`], or serde
//! deserialization (which routes through the same checks). Fields are private
//! and exposed through accessors, so a validated value stays as it was built.
//!
//! Wire field names are the camelCase names used by the front ends
//! (`numeroProcesso`, `valorCondenacao`, ...).

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;
use crate::timestamp;

/// Jurisdiction sphere of the court handling the case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Esfera {
    Federal,
    Estadual,
    Trabalhista,
    Eleitoral,
}

impl Esfera {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Federal => "Federal",
            Self::Estadual => "Estadual",
            Self::Trabalhista => "Trabalhista",
            Self::Eleitoral => "Eleitoral",
        }
    }
}

impl FromStr for Esfera {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        [
            Self::Federal,
            Self::Estadual,
            Self::Trabalhista,
            Self::Eleitoral,
        ]
        .into_iter()
        .find(|e| e.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| {
            format!("unknown esfera {s:?} (expected Federal, Estadual, Trabalhista or Eleitoral)")
        })
    }
}

impl<'de> Deserialize<'de> for Esfera {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One entry of the movement history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Movimento {
    #[serde(serialize_with = "timestamp::serialize")]
    pub data_hora: DateTime<Utc>,
    pub descricao: String,
}

/// Fee breakdown. Every amount is optional and non-negative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Honorarios {
    pub contratuais: Option<f64>,
    pub periciais: Option<f64>,
    pub sucumbenciais: Option<f64>,
}

/// A structured document extracted from the case file.
///
/// Narrowed to the fields the front ends actually send (`status`, `data`,
/// `resumo`, `indicacao`, `habilitacaoInventario`, `valor`). Any other key is
/// kept verbatim in `outros` and reaches the prompt unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentoEstruturado {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Free-form date as sent by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resumo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicacao: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub habilitacao_inventario: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valor: Option<f64>,
    #[serde(flatten)]
    pub outros: BTreeMap<String, serde_json::Value>,
}

/// The ten structured-document slots. Absent slots render as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentosEstruturados {
    pub sentenca_merito: Option<DocumentoEstruturado>,
    pub transito_julgado: Option<DocumentoEstruturado>,
    pub cumprimento_definitivo_iniciado: Option<DocumentoEstruturado>,
    pub calculos_apresentados: Option<DocumentoEstruturado>,
    pub intimacao_ente_publico: Option<DocumentoEstruturado>,
    pub prazo_impugnacao_aberto: Option<DocumentoEstruturado>,
    pub requisitorio: Option<DocumentoEstruturado>,
    pub cessao_previa_pagamento: Option<DocumentoEstruturado>,
    pub substabelecimento_sem_reserva: Option<DocumentoEstruturado>,
    pub obito_autor: Option<DocumentoEstruturado>,
}

impl DocumentosEstruturados {
    /// Present slots, in declaration order, with their wire names.
    pub fn slots(&self) -> impl Iterator<Item = (&'static str, &DocumentoEstruturado)> {
        [
            ("sentencaMerito", &self.sentenca_merito),
            ("transitoJulgado", &self.transito_julgado),
            ("cumprimentoDefinitivoIniciado", &self.cumprimento_definitivo_iniciado),
            ("calculosApresentados", &self.calculos_apresentados),
            ("intimacaoEntePublico", &self.intimacao_ente_publico),
            ("prazoImpugnacaoAberto", &self.prazo_impugnacao_aberto),
            ("requisitorio", &self.requisitorio),
            ("cessaoPreviaPagamento", &self.cessao_previa_pagamento),
            ("substabelecimentoSemReserva", &self.substabelecimento_sem_reserva),
            ("obitoAutor", &self.obito_autor),
        ]
        .into_iter()
        .filter_map(|(name, slot)| slot.as_ref().map(|doc| (name, doc)))
    }
}

/// Validated judicial process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProcessoRaw", rename_all = "camelCase")]
pub struct Processo {
    numero_processo: String,
    classe: String,
    orgao_julgador: String,
    #[serde(serialize_with = "timestamp::serialize")]
    ultima_distribuicao: DateTime<Utc>,
    valor_causa: Option<f64>,
    assunto: String,
    segredo_justica: bool,
    justica_gratuita: bool,
    sigla_tribunal: String,
    esfera: Esfera,
    valor_condenacao: Option<f64>,
    documentos: Option<DocumentosEstruturados>,
    movimentos: Option<Vec<Movimento>>,
    honorarios: Option<Honorarios>,
}

impl Processo {
    /// Structurally validate caller-supplied JSON.
    ///
    /// Rejects missing or blank required fields, wrong types, unparseable
    /// timestamps and negative or non-finite amounts. No business rule is
    /// evaluated here.
    pub fn validate(raw: serde_json::Value) -> Result<Self, ValidationError> {
        let raw: ProcessoRaw = serde_json::from_value(raw)?;
        Self::try_from(raw)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self, ValidationError> {
        let raw: ProcessoRaw = serde_json::from_str(s)?;
        Self::try_from(raw)
    }

    /// Stable textual form embedded in prompts.
    ///
    /// Field order follows the declaration order above, timestamps are
    /// RFC 3339 UTC and absent optionals are rendered as `null`. Parsing the
    /// output with [`Processo::from_json_str`] yields an equal value.
    pub fn to_canonical_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn numero_processo(&self) -> &str {
        &self.numero_processo
    }

    pub fn classe(&self) -> &str {
        &self.classe
    }

    pub fn orgao_julgador(&self) -> &str {
        &self.orgao_julgador
    }

    pub fn ultima_distribuicao(&self) -> DateTime<Utc> {
        self.ultima_distribuicao
    }

    pub fn valor_causa(&self) -> Option<f64> {
        self.valor_causa
    }

    pub fn assunto(&self) -> &str {
        &self.assunto
    }

    pub fn segredo_justica(&self) -> bool {
        self.segredo_justica
    }

    pub fn justica_gratuita(&self) -> bool {
        self.justica_gratuita
    }

    pub fn sigla_tribunal(&self) -> &str {
        &self.sigla_tribunal
    }

    pub fn esfera(&self) -> Esfera {
        self.esfera
    }

    pub fn valor_condenacao(&self) -> Option<f64> {
        self.valor_condenacao
    }

    pub fn documentos(&self) -> Option<&DocumentosEstruturados> {
        self.documentos.as_ref()
    }

    pub fn movimentos(&self) -> &[Movimento] {
        self.movimentos.as_deref().unwrap_or_default()
    }

    pub fn honorarios(&self) -> Option<&Honorarios> {
        self.honorarios.as_ref()
    }
}

// ── Unvalidated wire shape ──

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MovimentoRaw {
    data_hora: Option<String>,
    descricao: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProcessoRaw {
    numero_processo: Option<String>,
    classe: Option<String>,
    orgao_julgador: Option<String>,
    ultima_distribuicao: Option<String>,
    valor_causa: Option<f64>,
    assunto: Option<String>,
    segredo_justica: Option<bool>,
    justica_gratuita: Option<bool>,
    sigla_tribunal: Option<String>,
    esfera: Option<Esfera>,
    valor_condenacao: Option<f64>,
    documentos: Option<DocumentosEstruturados>,
    movimentos: Option<Vec<MovimentoRaw>>,
    honorarios: Option<Honorarios>,
}

impl TryFrom<ProcessoRaw> for Processo {
    type Error = ValidationError;

    fn try_from(raw: ProcessoRaw) -> Result<Self, Self::Error> {
        let ultima_distribuicao = required("ultimaDistribuicao", raw.ultima_distribuicao)?;
        let ultima_distribuicao = timestamp::parse(&ultima_distribuicao).ok_or(
            ValidationError::InvalidTimestamp {
                field: "ultimaDistribuicao",
                value: ultima_distribuicao,
            },
        )?;

        let movimentos = raw
            .movimentos
            .map(|list| list.into_iter().map(Movimento::try_from).collect())
            .transpose()?;

        let honorarios = raw.honorarios.map(Honorarios::validated).transpose()?;

        let documentos = match raw.documentos {
            Some(docs) => {
                for (name, doc) in docs.slots() {
                    amount(&format!("documentos.{name}.valor"), doc.valor)?;
                }
                Some(docs)
            }
            None => None,
        };

        Ok(Self {
            numero_processo: required("numeroProcesso", raw.numero_processo)?,
            classe: required("classe", raw.classe)?,
            orgao_julgador: required("orgaoJulgador", raw.orgao_julgador)?,
            ultima_distribuicao,
            valor_causa: amount("valorCausa", raw.valor_causa)?,
            assunto: required("assunto", raw.assunto)?,
            segredo_justica: raw
                .segredo_justica
                .ok_or(ValidationError::MissingField("segredoJustica"))?,
            justica_gratuita: raw
                .justica_gratuita
                .ok_or(ValidationError::MissingField("justicaGratuita"))?,
            sigla_tribunal: required("siglaTribunal", raw.sigla_tribunal)?,
            esfera: raw.esfera.ok_or(ValidationError::MissingField("esfera"))?,
            valor_condenacao: amount("valorCondenacao", raw.valor_condenacao)?,
            documentos,
            movimentos,
            honorarios,
        })
    }
}

impl TryFrom<MovimentoRaw> for Movimento {
    type Error = ValidationError;

    fn try_from(raw: MovimentoRaw) -> Result<Self, Self::Error> {
        let data_hora = required("movimentos.dataHora", raw.data_hora)?;
        let data_hora =
            timestamp::parse(&data_hora).ok_or(ValidationError::InvalidTimestamp {
                field: "movimentos.dataHora",
                value: data_hora,
            })?;
        Ok(Self {
            data_hora,
            descricao: required("movimentos.descricao", raw.descricao)?,
        })
    }
}

impl Honorarios {
    fn validated(self) -> Result<Self, ValidationError> {
        Ok(Self {
            contratuais: amount("honorarios.contratuais", self.contratuais)?,
            periciais: amount("honorarios.periciais", self.periciais)?,
            sucumbenciais: amount("honorarios.sucumbenciais", self.sucumbenciais)?,
        })
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::MissingField(field)),
    }
}

fn amount(field: &str, value: Option<f64>) -> Result<Option<f64>, ValidationError> {
    match value {
        Some(v) if !v.is_finite() => Err(ValidationError::NonFiniteAmount {
            field: field.to_string(),
        }),
        Some(v) if v < 0.0 => Err(ValidationError::NegativeAmount {
            field: field.to_string(),
            value: v,
        }),
        other => Ok(other),
    }
}
