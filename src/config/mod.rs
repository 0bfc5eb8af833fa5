//! Configuration module
//!
//! Handles loading and layering configuration: defaults, config file,
//! environment variables, then command-line flags.

mod env;
mod file;

pub use env::{print_env_help, Credentials, EnvConfig};
pub use file::ConfigFile;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default Workers AI model
pub const DEFAULT_MODEL: &str = "@cf/meta/llama-3.2-3b-instruct";

/// Default Cloudflare API base URL
pub const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default system instruction sent with every prompt
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert on Hindu mythology, philosophy, and culture. \
Provide accurate, educational, and insightful answers about Krishna, drawing from \
authentic Hindu scriptures, traditions, and scholarly interpretations. \
Be comprehensive but concise, and maintain cultural sensitivity.";

/// Configuration errors. These abort a run before any query is sent.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing required credential {0} (set it or run with --demo)")]
    MissingCredential(&'static str),

    #[error("Invalid delay {0}: must be a finite number of seconds >= 0")]
    InvalidDelay(f64),

    #[error("Invalid batch size {0}: must be at least 1")]
    InvalidBatchSize(usize),

    #[error("Invalid timeout {0}: must be at least 1 second")]
    InvalidTimeout(u64),

    #[error("Unknown output format: {0}")]
    UnknownFormat(String),

    #[error("Failed to read prompts from {path}: {reason}")]
    PromptsFile { path: String, reason: String },
}

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Delay between queries in seconds
    pub delay_secs: f64,

    /// Queries per batch for progress reporting
    pub batch_size: usize,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,

    /// Workers AI model name
    pub model: String,

    /// API base URL
    pub api_base: String,

    /// System instruction sent with every prompt
    pub system_prompt: String,

    /// Report format (text, json, json-pretty, markdown, csv)
    pub format: String,

    /// Use the offline demo responder
    pub demo: bool,

    /// Demo responder settings
    pub demo_responder: DemoConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            delay_secs: 0.5,
            batch_size: 10,
            timeout_secs: 30,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            format: "text".to_string(),
            demo: false,
            demo_responder: DemoConfig::default(),
        }
    }
}

impl AppConfig {
    /// Override fields with values present in the environment
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(delay) = env.delay {
            self.delay_secs = delay;
        }
        if let Some(batch_size) = env.batch_size {
            self.batch_size = batch_size;
        }
        if let Some(timeout) = env.timeout {
            self.timeout_secs = timeout;
        }
        if let Some(model) = &env.model {
            self.model = model.clone();
        }
        if let Some(api_base) = &env.api_base {
            self.api_base = api_base.clone();
        }
        if let Some(format) = &env.format {
            self.format = format.clone();
        }
        if let Some(demo) = env.demo {
            self.demo = demo;
        }
    }

    /// Validate run parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.delay_secs.is_finite() || self.delay_secs < 0.0 {
            return Err(ConfigError::InvalidDelay(self.delay_secs));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize(self.batch_size));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(self.timeout_secs));
        }
        Ok(())
    }
}

/// Offline demo responder configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Simulated base latency in milliseconds
    pub latency_ms: u64,

    /// Maximum random jitter added to the base latency
    pub jitter_ms: u64,

    /// Placeholder response text
    pub response: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            latency_ms: 100,
            jitter_ms: 50,
            response: "Mock response: Krishna is a central figure in Hindu tradition, known for \
                his teachings in the Bhagavad Gita and his divine pastimes."
                .to_string(),
        }
    }
}
