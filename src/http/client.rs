//! HTTP client for inference API calls
//!
//! Thin wrapper over reqwest with a fixed timeout, default headers and
//! transport error classification.

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION},
    Client,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

/// HTTP client errors
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Connection refused to {0}")]
    ConnectionRefused(String),

    #[error("Invalid header {0}")]
    InvalidHeader(String),

    #[error("Failed to read response body: {0}")]
    Body(String),

    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

/// JSON-over-HTTP client
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Option<String>,
    default_headers: HeaderMap,
    timeout_secs: u64,
}

impl HttpClient {
    /// Create client with custom timeout
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;

        Ok(Self {
            client,
            base_url: None,
            default_headers: HeaderMap::new(),
            timeout_secs,
        })
    }

    /// Set base URL for requests
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Add default header
    pub fn default_header(
        mut self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, HttpError> {
        let header_name = HeaderName::from_bytes(key.as_ref().as_bytes())
            .map_err(|_| HttpError::InvalidHeader(key.as_ref().to_string()))?;
        let mut header_value = HeaderValue::from_str(value.as_ref())
            .map_err(|_| HttpError::InvalidHeader(key.as_ref().to_string()))?;
        if header_name == AUTHORIZATION {
            header_value.set_sensitive(true);
        }
        self.default_headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Add a bearer token authorization header
    pub fn bearer_auth(self, token: impl AsRef<str>) -> Result<Self, HttpError> {
        self.default_header(AUTHORIZATION.as_str(), format!("Bearer {}", token.as_ref()))
    }

    /// Build full URL
    fn build_url(&self, path: &str) -> String {
        match &self.base_url {
            Some(base) => {
                if path.starts_with("http://") || path.starts_with("https://") {
                    path.to_string()
                } else {
                    format!(
                        "{}/{}",
                        base.trim_end_matches('/'),
                        path.trim_start_matches('/')
                    )
                }
            }
            None => path.to_string(),
        }
    }

    /// POST a JSON body and read the response as text
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<HttpResponse, HttpError> {
        let url = self.build_url(path);
        debug!("Sending POST request to {}", url);

        let start = Instant::now();

        let response = self
            .client
            .post(&url)
            .headers(self.default_headers.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    HttpError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    HttpError::ConnectionRefused(url.clone())
                } else {
                    HttpError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();

        let mut headers = HashMap::new();
        for (key, value) in response.headers().iter() {
            if let Ok(v) = value.to_str() {
                headers.insert(key.to_string(), v.to_string());
            }
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout(self.timeout_secs)
            } else {
                HttpError::Body(e.to_string())
            }
        })?;

        let duration_ms = start.elapsed().as_millis() as u64;
        debug!(
            "Response: {} {} in {}ms",
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            duration_ms
        );

        Ok(HttpResponse {
            status_code: status.as_u16(),
            headers,
            body,
            duration_ms,
        })
    }
}

/// HTTP response
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub duration_ms: u64,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers.get(&name.to_lowercase())
    }
}
