//! Environment variable configuration
//!
//! Provides environment variable overrides and API credentials.

use std::env;

use super::ConfigError;

/// Environment variable prefix
const ENV_PREFIX: &str = "BATCH_QUERY";

/// API key variable
const API_KEY_VAR: &str = "CLOUDFLARE_API_KEY";

/// Account ID variable
const ACCOUNT_ID_VAR: &str = "CLOUDFLARE_ACCOUNT_ID";

/// Model variable
const MODEL_VAR: &str = "LLM_MODEL";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// API key from CLOUDFLARE_API_KEY
    pub api_key: Option<String>,
    /// Account ID from CLOUDFLARE_ACCOUNT_ID
    pub account_id: Option<String>,
    /// Model from LLM_MODEL
    pub model: Option<String>,
    /// Delay from BATCH_QUERY_DELAY
    pub delay: Option<f64>,
    /// Batch size from BATCH_QUERY_BATCH_SIZE
    pub batch_size: Option<usize>,
    /// Timeout from BATCH_QUERY_TIMEOUT
    pub timeout: Option<u64>,
    /// Output format from BATCH_QUERY_FORMAT
    pub format: Option<String>,
    /// Demo mode from BATCH_QUERY_DEMO
    pub demo: Option<bool>,
    /// Verbose from BATCH_QUERY_VERBOSE
    pub verbose: Option<bool>,
    /// Config file from BATCH_QUERY_CONFIG
    pub config_file: Option<String>,
    /// API base URL from BATCH_QUERY_API_BASE
    pub api_base: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            api_key: non_empty(env::var(API_KEY_VAR).ok()),
            account_id: non_empty(env::var(ACCOUNT_ID_VAR).ok()),
            model: non_empty(env::var(MODEL_VAR).ok()),
            delay: get_env_parse("DELAY"),
            batch_size: get_env_parse("BATCH_SIZE"),
            timeout: get_env_parse("TIMEOUT"),
            format: get_env("FORMAT"),
            demo: get_env_bool("DEMO"),
            verbose: get_env_bool("VERBOSE"),
            config_file: get_env("CONFIG"),
            api_base: get_env("API_BASE"),
        }
    }

    /// API credentials, required for live queries
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let api_key = self
            .api_key
            .clone()
            .ok_or(ConfigError::MissingCredential(API_KEY_VAR))?;
        let account_id = self
            .account_id
            .clone()
            .ok_or(ConfigError::MissingCredential(ACCOUNT_ID_VAR))?;

        Ok(Credentials {
            api_key,
            account_id,
        })
    }

    /// Print current environment configuration with secrets masked
    pub fn print_summary(&self) {
        println!("Environment Configuration:");
        println!("  {API_KEY_VAR}:        {}", set_or_not(&self.api_key));
        println!("  {ACCOUNT_ID_VAR}:     {}", set_or_not(&self.account_id));
        println!("  {MODEL_VAR}:                 {:?}", self.model);
        println!("  {ENV_PREFIX}_DELAY:        {:?}", self.delay);
        println!("  {ENV_PREFIX}_BATCH_SIZE:   {:?}", self.batch_size);
        println!("  {ENV_PREFIX}_TIMEOUT:      {:?}", self.timeout);
        println!("  {ENV_PREFIX}_FORMAT:       {:?}", self.format);
        println!("  {ENV_PREFIX}_DEMO:         {:?}", self.demo);
        println!("  {ENV_PREFIX}_VERBOSE:      {:?}", self.verbose);
        println!("  {ENV_PREFIX}_CONFIG:       {:?}", self.config_file);
        println!("  {ENV_PREFIX}_API_BASE:     {:?}", self.api_base);
    }
}

/// Cloudflare API credentials
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub account_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***")
            .field("account_id", &self.account_id)
            .finish()
    }
}

/// "Set" / "Not Set" label for a secret
pub fn set_or_not(value: &Option<String>) -> &'static str {
    if value.is_some() {
        "Set"
    } else {
        "Not Set"
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    non_empty(env::var(format!("{ENV_PREFIX}_{name}")).ok())
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.trim().parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// Builder for setting environment variables in tests
#[cfg(test)]
pub struct EnvBuilder {
    vars: Vec<(String, String)>,
}

#[cfg(test)]
impl EnvBuilder {
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    pub fn var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.push((key.into(), value.into()));
        self
    }

    pub fn prefixed(self, name: &str, value: impl Into<String>) -> Self {
        self.var(format!("{ENV_PREFIX}_{name}"), value)
    }

    /// Apply and return guard that restores on drop
    pub fn apply_scoped(self) -> EnvGuard {
        let previous: Vec<_> = self
            .vars
            .iter()
            .map(|(k, _)| (k.clone(), env::var(k).ok()))
            .collect();

        for (key, value) in self.vars {
            env::set_var(key, value);
        }

        EnvGuard { previous }
    }
}

/// Guard that restores environment variables on drop
#[cfg(test)]
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

#[cfg(test)]
impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

/// Print all supported environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {API_KEY_VAR}         Workers AI API token (required unless --demo)");
    println!("  {ACCOUNT_ID_VAR}      Cloudflare account ID (required unless --demo)");
    println!("  {MODEL_VAR}                  Model name (default: @cf/meta/llama-3.2-3b-instruct)");
    println!("  {ENV_PREFIX}_DELAY         Delay between queries in seconds");
    println!("  {ENV_PREFIX}_BATCH_SIZE    Queries per progress batch");
    println!("  {ENV_PREFIX}_TIMEOUT       Request timeout in seconds");
    println!("  {ENV_PREFIX}_FORMAT        Report format (text, json, json-pretty, markdown, csv)");
    println!("  {ENV_PREFIX}_DEMO          Use the offline demo responder (true/false)");
    println!("  {ENV_PREFIX}_VERBOSE       Enable debug logging (true/false)");
    println!("  {ENV_PREFIX}_CONFIG        Path to configuration file");
    println!("  {ENV_PREFIX}_API_BASE      Override the API base URL");
    println!();
    println!("Example:");
    println!("  export {API_KEY_VAR}=...");
    println!("  export {ACCOUNT_ID_VAR}=...");
    println!("  batch-query run --questions 10 --delay 0.5");
}
