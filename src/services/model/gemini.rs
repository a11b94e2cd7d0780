/// Google Gemini provider
///
/// Calls `models/{model}:generateContent` with a JSON response schema so the
/// answer comes back as machine-parseable JSON rather than prose.
///
/// The API key travels in the `x-goog-api-key` header. Keeping it out of the
/// query string keeps it out of `reqwest::Error` messages, which include the
/// request URL and end up in logs.
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{GenerativeModel, ModelError, ModelResult};
use crate::services::credentials::ApiKey;

const API_KEY_HEADER: &str = "x-goog-api-key";
const JSON_MIME_TYPE: &str = "application/json";

#[derive(Clone)]
pub struct GeminiModel {
    http_client: HttpClient,
    api_url: String,
    model_id: String,
}

impl GeminiModel {
    pub fn new(api_url: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self::with_client(HttpClient::new(), api_url, model_id)
    }

    pub fn with_client(
        http_client: HttpClient,
        api_url: impl Into<String>,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            model_id: model_id.into(),
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_url, self.model_id)
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_json_schema: &'a Value,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(prompt: &'a str, schema: &'a Value) -> Self {
        Self {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: JSON_MIME_TYPE,
                response_json_schema: schema,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    thought: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Joins the text parts of the first candidate, skipping thought parts
fn extract_text(response: GenerateContentResponse) -> ModelResult<String> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(ModelError::Blocked(reason));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ModelError::InvalidResponse("no candidate in response".to_string()))?;

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|part| !part.thought.unwrap_or(false))
        .filter_map(|part| part.text)
        .collect();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
        return Err(ModelError::InvalidResponse(format!(
            "candidate has no text (finish reason: {})",
            reason
        )));
    }

    Ok(text)
}

#[async_trait::async_trait]
impl GenerativeModel for GeminiModel {
    async fn generate_json(
        &self,
        api_key: &ApiKey,
        prompt: &str,
        schema: &Value,
    ) -> ModelResult<String> {
        let body = GenerateContentRequest::new(prompt, schema);

        tracing::debug!(
            model = %self.model_id,
            prompt_chars = prompt.len(),
            "Sending generateContent request"
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key.expose())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                model = %self.model_id,
                status = %status,
                "Gemini request failed"
            );
            return Err(ModelError::Status(status, body));
        }

        let envelope: GenerateContentResponse = response.json().await?;
        let text = extract_text(envelope)?;

        tracing::info!(
            model = %self.model_id,
            response_chars = text.len(),
            provider = "gemini",
            "Structured generation completed"
        );

        Ok(text)
    }
}
