//! Remote responder capability
//!
//! A responder turns a prompt plus a system instruction into response text.
//! The batch client only sees this trait; the concrete implementation is chosen
//! by configuration.

mod cloudflare;
mod demo;
#[cfg(test)]
mod stub;

pub use cloudflare::CloudflareResponder;
pub use demo::DemoResponder;
#[cfg(test)]
pub use stub::StubResponder;

use async_trait::async_trait;
use thiserror::Error;

use crate::http::HttpError;

/// Responder failures. Always recovered into a failed query result.
#[derive(Error, Debug)]
pub enum ResponderError {
    #[error(transparent)]
    Transport(#[from] HttpError),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Something that answers prompts
#[async_trait]
pub trait Responder: Send + Sync {
    /// Short name used in logs and reports
    fn name(&self) -> &str;

    /// Send a prompt with a system instruction and return the response text
    async fn respond(&self, prompt: &str, system_prompt: &str) -> Result<String, ResponderError>;
}
