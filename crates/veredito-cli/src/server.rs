//! HTTP boundary: `POST /verificar` and `GET /health`.
//!
//! A body that does not deserialize into a valid [`Processo`] is answered
//! with 422 before the decision protocol is touched. Anything after that is
//! answered with 200 and a decision, since the protocol never fails.

use std::net::SocketAddr;

use anyhow::Context;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tracing::{info, warn};
use veredito_ai::DecisionProtocol;
use veredito_core::{Decisao, Processo};

type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    detail: String,
}

pub fn router(protocol: DecisionProtocol) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/verificar", post(verificar))
        .with_state(protocol)
}

pub async fn serve(bind: SocketAddr, protocol: DecisionProtocol) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("binding {bind}"))?;
    info!(addr = %bind, "veredito listening");

    axum::serve(listener, router(protocol))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("veredito stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn verificar(
    State(protocol): State<DecisionProtocol>,
    body: Result<Json<Processo>, JsonRejection>,
) -> Result<Json<Decisao>, ApiError> {
    let Json(processo) = body.map_err(|rejection| {
        let detail = rejection.body_text();
        warn!(detail = %detail, "rejected process body");
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse { detail }),
        )
    })?;

    Ok(Json(protocol.evaluate(&processo).await))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;
    use veredito_ai::fakes::{FailingReasoner, ScriptedReasoner};
    use veredito_ai::{ProtocolOptions, RATIONALE_ANALYSIS_ERROR, RATIONALE_INVALID_JSON, Reasoner};
    use veredito_core::PolicyCorpus;

    fn sample() -> Value {
        json!({
            "numeroProcesso": "0004587-00.2021.4.05.8100",
            "classe": "Cumprimento de Sentença contra a Fazenda Pública",
            "orgaoJulgador": "19ª VARA FEDERAL - SOBRAL/CE",
            "ultimaDistribuicao": "2024-11-18T00:00:00Z",
            "valorCausa": 67592.0,
            "assunto": "Rural (Art. 48/51)",
            "segredoJustica": false,
            "justicaGratuita": true,
            "siglaTribunal": "TRF5",
            "esfera": "Federal",
            "valorCondenacao": 67592.0,
            "documentos": {
                "sentencaMerito": { "data": "2023-09-10", "resumo": "Procedência parcial do pedido..." },
                "transitoJulgado": { "status": "Sim", "indicacao": "Certidão juntada em 12/12/2023..." },
                "cumprimentoDefinitivoIniciado": { "status": "Sim", "data": "2024-01-20" },
                "obitoAutor": { "status": "Não", "habilitacaoInventario": "Não aplicável" }
            },
            "honorarios": { "contratuais": 6000.0, "periciais": 1200.0, "sucumbenciais": null }
        })
    }

    fn app(reasoner: Arc<dyn Reasoner>) -> Router {
        router(DecisionProtocol::new(
            Arc::new(PolicyCorpus::builtin()),
            reasoner,
            ProtocolOptions::default(),
        ))
    }

    async fn post_json(app: Router, body: String) -> (StatusCode, Value) {
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/verificar")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_is_ok() {
        let resp = app(Arc::new(FailingReasoner::new()))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn approved_decision_end_to_end() {
        let reasoner = Arc::new(ScriptedReasoner::always(
            r#"{"decision":"approved","rationale":"Atende POL-1 e POL-2","citacoes":["POL-1","POL-2"]}"#,
        ));
        let (status, body) = post_json(app(reasoner.clone()), sample().to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "decision": "approved",
                "rationale": "Atende POL-1 e POL-2",
                "citacoes": ["POL-1", "POL-2"]
            })
        );
        assert_eq!(reasoner.calls(), 1);
    }

    #[tokio::test]
    async fn missing_numero_processo_is_422_without_reasoning() {
        let reasoner = Arc::new(ScriptedReasoner::always("{}"));
        let mut body = sample();
        body.as_object_mut().unwrap().remove("numeroProcesso");

        let (status, err) = post_json(app(reasoner.clone()), body.to_string()).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err["detail"].as_str().unwrap().contains("numeroProcesso"));
        assert_eq!(reasoner.calls(), 0);
    }

    #[tokio::test]
    async fn wrong_type_and_negative_amount_are_422() {
        let reasoner = Arc::new(ScriptedReasoner::always("{}"));

        let mut wrong_type = sample();
        wrong_type["justicaGratuita"] = json!("sim");
        let (status, _) = post_json(app(reasoner.clone()), wrong_type.to_string()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let mut negative = sample();
        negative["valorCondenacao"] = json!(-10.0);
        let (status, _) = post_json(app(reasoner.clone()), negative.to_string()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = post_json(app(reasoner.clone()), "{not json".to_string()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        assert_eq!(reasoner.calls(), 0);
    }

    #[tokio::test]
    async fn unparseable_reply_is_200_incomplete() {
        let reasoner = Arc::new(ScriptedReasoner::always("I cannot answer"));
        let (status, body) = post_json(app(reasoner), sample().to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["decision"], "incomplete");
        assert_eq!(body["rationale"], RATIONALE_INVALID_JSON);
        assert_eq!(body["citacoes"], json!(["POL-8"]));
    }

    #[tokio::test]
    async fn reasoning_outage_is_200_incomplete() {
        let (status, body) =
            post_json(app(Arc::new(FailingReasoner::new())), sample().to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["decision"], "incomplete");
        assert_eq!(body["rationale"], RATIONALE_ANALYSIS_ERROR);
        assert_eq!(body["citacoes"], json!(["POL-8"]));
    }
}
