use std::fmt;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, Result};
use crate::http::CLIENT;

/// How the provider should shape its reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Completion {
    pub prompt: String,
    pub temperature: f32,
    pub format: ResponseFormat,
}

/// A text-generation backend. Invoked once per request; no retries.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, api_key: &str, completion: &Completion) -> Result<String>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Debug, Deserialize)]
struct ReplyPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderError,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: String,
}

/// Google Gemini over the `generateContent` REST endpoint.
pub struct GeminiModel {
    base_url: String,
    model: String,
}

impl GeminiModel {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

impl fmt::Debug for GeminiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiModel")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl LanguageModel for GeminiModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, api_key: &str, completion: &Completion) -> Result<String> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: &completion.prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: completion.temperature,
                response_mime_type: match completion.format {
                    ResponseFormat::Json => Some("application/json"),
                    ResponseFormat::Text => None,
                },
            },
        };

        debug!(model = %self.model, prompt_chars = completion.prompt.len(), "calling Gemini");

        let res = CLIENT
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::GenerationError(e.to_string()))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| AppError::GenerationError(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ProviderErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or(text);
            return Err(AppError::GenerationError(format!("{} ({})", message, status)));
        }

        reply_text(&text)
    }
}

/// Concatenates the text parts of the first candidate.
fn reply_text(raw: &str) -> Result<String> {
    let parsed: GenerateContentResponse =
        serde_json::from_str(raw).map_err(|e| AppError::GenerationError(e.to_string()))?;

    let reply: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .ok_or_else(|| AppError::GenerationError("Invalid response format from LLM".to_string()))?;

    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_text_joins_parts() {
        let raw = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Veni, "},{"text":"vidi."}]}}]}"#;
        assert_eq!(reply_text(raw).unwrap(), "Veni, vidi.");
    }

    #[test]
    fn test_reply_without_candidates_is_an_error() {
        let err = reply_text(r#"{"candidates":[]}"#).unwrap_err();
        assert!(matches!(err, AppError::GenerationError(_)));
    }

    #[test]
    fn test_request_shape() {
        let body = GenerateContentRequest {
            contents: vec![Content { role: "user", parts: vec![Part { text: "hi" }] }],
            generation_config: GenerationConfig { temperature: 0.9, response_mime_type: Some("application/json") },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn test_endpoint() {
        let model = GeminiModel::new("https://example.test/v1beta/", "gemini-x");
        assert_eq!(model.endpoint(), "https://example.test/v1beta/models/gemini-x:generateContent");
    }
}
