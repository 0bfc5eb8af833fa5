//! Cloudflare Workers AI responder
//!
//! Calls `POST {api_base}/accounts/{account_id}/ai/run/{model}` with a chat
//! message list and reads `result.response` from the envelope.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Responder, ResponderError};
use crate::config::Credentials;
use crate::http::HttpClient;

/// Chat message in the request body
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct RunRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
}

/// Response envelope
#[derive(Debug, Deserialize)]
struct RunResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    result: Option<RunResult>,
    #[serde(default)]
    errors: Vec<ApiMessage>,
}

#[derive(Debug, Deserialize)]
struct RunResult {
    #[serde(default)]
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: String,
}

/// Workers AI text generation responder
pub struct CloudflareResponder {
    http: HttpClient,
    path: String,
    model: String,
}

impl CloudflareResponder {
    /// Create a responder for the given account and model
    pub fn new(
        credentials: &Credentials,
        api_base: &str,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, ResponderError> {
        let model = model.into();
        let http = HttpClient::with_timeout(timeout_secs)?
            .base_url(api_base)
            .bearer_auth(&credentials.api_key)?;

        Ok(Self {
            http,
            path: format!("/accounts/{}/ai/run/{}", credentials.account_id, model),
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Responder for CloudflareResponder {
    fn name(&self) -> &str {
        "cloudflare"
    }

    async fn respond(&self, prompt: &str, system_prompt: &str) -> Result<String, ResponderError> {
        let request = RunRequest {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self.http.post_json(&self.path, &request).await?;
        if let Some(ray) = response.get_header("cf-ray") {
            debug!("cf-ray: {}", ray);
        }

        if !response.is_success() {
            return Err(ResponderError::Status {
                status: response.status_code,
                body: response.body,
            });
        }

        let envelope: RunResponse = serde_json::from_str(&response.body)
            .map_err(|e| ResponderError::Malformed(e.to_string()))?;

        if !envelope.success {
            let message = envelope
                .errors
                .iter()
                .map(|e| match e.code {
                    Some(code) => format!("{code}: {}", e.message),
                    None => e.message.clone(),
                })
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ResponderError::Api(if message.is_empty() {
                "request was not successful".to_string()
            } else {
                message
            }));
        }

        envelope
            .result
            .and_then(|r| r.response)
            .ok_or_else(|| ResponderError::Malformed("missing result.response".to_string()))
    }
}
