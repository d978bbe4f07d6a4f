//! HTTP client for the Gemini `generateContent` endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ReasonerError;
use crate::reasoner::Reasoner;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Reasoning service backed by Google Gemini.
///
/// `reqwest::Client` pools connections and is safe to share, so one instance
/// serves every concurrent evaluation.
pub struct GeminiReasoner {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [TextPart<'a>; 1],
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Deserialize)]
struct ReplyPart {
    text: Option<String>,
}

impl GeminiReasoner {
    /// `base_url` should be like `https://generativelanguage.googleapis.com/v1beta`
    /// (a trailing slash is tolerated).
    pub fn new(base_url: String, model: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

fn request_body(prompt: &str, temperature: f32) -> GenerateRequest<'_> {
    GenerateRequest {
        contents: [Content {
            role: "user",
            parts: [TextPart { text: prompt }],
        }],
        generation_config: GenerationConfig { temperature },
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(body: &str) -> Result<String, ReasonerError> {
    let resp: GenerateResponse = serde_json::from_str(body)?;
    let text: String = resp
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ReasonerError::EmptyReply);
    }
    Ok(text)
}

#[async_trait]
impl Reasoner for GeminiReasoner {
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, ReasonerError> {
        let url = self.endpoint();

        debug!(model = %self.model, prompt_chars = prompt.len(), "calling reasoning service");
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(prompt, temperature))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ReasonerError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        let text = extract_text(&body)?;
        debug!(model = %self.model, reply_chars = text.len(), "reasoning service replied");
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let json = serde_json::to_value(request_body("analise", 0.1)).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "analise");
        let temperature = json["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.1).abs() < 1e-6);
    }

    #[test]
    fn extracts_and_joins_text_parts() {
        let body = r#"{
            "candidates": [
                { "content": { "role": "model", "parts": [ { "text": "{\"decision\":" }, { "text": "\"approved\"}" } ] },
                  "finishReason": "STOP" },
                { "content": { "parts": [ { "text": "ignored" } ] } }
            ],
            "usageMetadata": { "totalTokenCount": 42 }
        }"#;
        assert_eq!(extract_text(body).unwrap(), r#"{"decision":"approved"}"#);
    }

    #[test]
    fn no_candidates_is_empty_reply() {
        assert!(matches!(
            extract_text(r#"{"candidates": []}"#),
            Err(ReasonerError::EmptyReply)
        ));
        assert!(matches!(
            extract_text(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#),
            Err(ReasonerError::EmptyReply)
        ));
        assert!(matches!(
            extract_text(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#),
            Err(ReasonerError::EmptyReply)
        ));
    }

    #[test]
    fn malformed_body_is_json_error() {
        assert!(matches!(extract_text("<html>"), Err(ReasonerError::Json(_))));
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        let r = GeminiReasoner::new(
            "https://example.test/v1beta/".into(),
            "gemini-2.5-flash".into(),
            "k".into(),
        );
        assert_eq!(
            r.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(r.model(), "gemini-2.5-flash");
    }
}
