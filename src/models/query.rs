//! Query models for batch execution
//!
//! Defines query items submitted to a responder and the results recorded for them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker prefixed to the response text of a failed query
pub const ERROR_MARKER: &str = "Connection Error";

/// A single prompt queued for submission
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryItem {
    /// 1-based position in the overall sequence
    pub index: usize,
    /// Prompt text
    pub prompt: String,
}

impl QueryItem {
    pub fn new(index: usize, prompt: impl Into<String>) -> Self {
        Self {
            index,
            prompt: prompt.into(),
        }
    }

    /// Number prompts in submission order, starting at 1
    pub fn sequence<I, S>(prompts: I) -> Vec<QueryItem>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        prompts
            .into_iter()
            .enumerate()
            .map(|(i, prompt)| QueryItem::new(i + 1, prompt))
            .collect()
    }
}

/// Outcome of one query
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Ordinal of the originating query item
    pub index: usize,
    /// Prompt as submitted
    pub prompt: String,
    /// Response text, or an error marker string on failure
    pub response: String,
    /// Wall-clock latency in milliseconds (0.0 when the call never completed)
    pub latency_ms: f64,
    /// Whether the responder returned a response
    pub success: bool,
}

impl QueryResult {
    pub fn success(item: &QueryItem, response: impl Into<String>, latency_ms: f64) -> Self {
        Self {
            index: item.index,
            prompt: item.prompt.clone(),
            response: response.into(),
            latency_ms,
            success: true,
        }
    }

    pub fn failure(item: &QueryItem, error: impl fmt::Display) -> Self {
        Self {
            index: item.index,
            prompt: item.prompt.clone(),
            response: format!("{ERROR_MARKER}: {error}"),
            latency_ms: 0.0,
            success: false,
        }
    }

    pub fn symbol(&self) -> &'static str {
        if self.success {
            "✓"
        } else {
            "✗"
        }
    }

    /// Rough token estimate: whitespace-separated words of prompt and response
    pub fn estimated_tokens(&self) -> usize {
        self.prompt.split_whitespace().count() + self.response.split_whitespace().count()
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Question {} [{:.2}ms]",
            self.symbol(),
            self.index,
            self.latency_ms
        )?;
        if !self.success {
            write!(f, " - {}", self.response)?;
        }
        Ok(())
    }
}
