//! Thin OpenAI API client: one chat completion, one image generation.
//!
//! No retries, no timeouts, no caching — a slow upstream call blocks the
//! request for its full duration.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;

const API_BASE: &str = "https://api.openai.com/v1";

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: SecretString,
}

impl OpenAiClient {
    pub fn new(api_key: SecretString) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{API_BASE}/{path}")
    }

    /// One structured-output chat completion. Returns the raw message content,
    /// which the API guarantees to be a JSON object string.
    pub async fn chat_json(
        &self,
        model: &str,
        temperature: f32,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, UpstreamError> {
        let request = ChatRequest {
            model,
            temperature,
            response_format: ResponseFormat { kind: "json_object" },
            messages: vec![
                ChatMessage { role: "system", content: system_prompt },
                ChatMessage { role: "user", content: user_prompt },
            ],
        };

        let response = self
            .http
            .post(self.api_url("chat/completions"))
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| UpstreamError::Request(format!("chat/completions: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Request(format!(
                "chat/completions returned {status}"
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::InvalidResponse(format!("chat/completions body: {e}")))?;

        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| UpstreamError::InvalidResponse("chat/completions: no choices".into()))
    }

    /// One image generation. Returns the base64-encoded PNG payload.
    pub async fn generate_image_b64(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<String, UpstreamError> {
        let request = ImageRequest { model, prompt };

        let response = self
            .http
            .post(self.api_url("images/generations"))
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| UpstreamError::Request(format!("images/generations: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Request(format!(
                "images/generations returned {status}"
            )));
        }

        let body: ImageResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::InvalidResponse(format!("images/generations body: {e}")))?;

        body.data
            .into_iter()
            .next()
            .and_then(|d| d.b64_json)
            .ok_or_else(|| {
                UpstreamError::InvalidResponse("images/generations: no image data".into())
            })
    }
}

// ── Wire types ──────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    response_format: ResponseFormat,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Deserialize)]
struct ImageDatum {
    b64_json: Option<String>,
}
