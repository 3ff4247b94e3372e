//! Gemini `generateContent` backend.
//!
//! API: `{endpoint}/{model}:generateContent`, key in the `x-goog-api-key`
//! header. Structured output is requested through `responseSchema`.

use async_trait::async_trait;
use hydro_models::AdvisorConfig;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::backend::{AdvisoryBackend, GenerationRequest};
use crate::error::AdvisorError;

/// Harm categories relaxed so agronomic vocabulary (pesticides, pests,
/// chemicals) is not filtered.
pub const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeminiBackend {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiBackend {
    pub fn new(api_key: String, config: &AdvisorConfig) -> Self {
        Self::with_client(Client::new(), api_key, config)
    }

    pub fn with_client(client: Client, api_key: String, config: &AdvisorConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        }
    }

    fn url(&self) -> String {
        format!("{}/{}:generateContent", self.endpoint, self.model)
    }

    fn request_body(&self, request: &GenerationRequest) -> Value {
        let safety: Vec<Value> = SAFETY_CATEGORIES
            .iter()
            .map(|category| json!({"category": category, "threshold": "BLOCK_NONE"}))
            .collect();

        json!({
            "systemInstruction": {"parts": [{"text": request.system_instruction}]},
            "contents": [{"role": "user", "parts": [{"text": request.prompt}]}],
            "generationConfig": {
                "temperature": self.temperature,
                "maxOutputTokens": self.max_output_tokens,
                "responseMimeType": "application/json",
                "responseSchema": gemini_schema(&request.response_schema),
            },
            "safetySettings": safety,
        })
    }
}

/// Gemini expects OpenAPI type names in upper case.
fn gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    let converted = match (key.as_str(), value) {
                        ("type", Value::String(t)) => Value::String(t.to_uppercase()),
                        _ => gemini_schema(value),
                    };
                    (key.clone(), converted)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(gemini_schema).collect()),
        other => other.clone(),
    }
}

/// Text of the first candidate's first part.
fn first_candidate_text(response: GenerateResponse) -> Result<String, AdvisorError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let feedback = response
            .prompt_feedback
            .map(|f| f.to_string())
            .unwrap_or_else(|| "no candidates".to_string());
        return Err(AdvisorError::EmptyCandidate(feedback));
    };

    if candidate.finish_reason.as_deref() == Some("SAFETY") {
        return Err(AdvisorError::Blocked("finishReason=SAFETY".to_string()));
    }

    candidate
        .content
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| AdvisorError::EmptyCandidate("candidate has no text".to_string()))
}

#[async_trait]
impl AdvisoryBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, AdvisorError> {
        debug!(request_id = %request.request_id, model = %self.model, "Calling Gemini");

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(request))
            .send()
            .await
            .map_err(|e| AdvisorError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(request_id = %request.request_id, status = status.as_u16(), "Gemini request failed");
            return Err(AdvisorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AdvisorError::Http(e.to_string()))?;
        let parsed: GenerateResponse = serde_json::from_slice(&bytes)?;
        first_candidate_text(parsed)
    }
}
