//! Offline demo responder
//!
//! Returns fixed placeholder text after a simulated network delay. Never
//! touches the network.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;

use super::{Responder, ResponderError};
use crate::config::DemoConfig;

/// Placeholder responder for demo mode
pub struct DemoResponder {
    latency: Duration,
    jitter_ms: u64,
    response: String,
}

impl DemoResponder {
    pub fn new(config: &DemoConfig) -> Self {
        Self {
            latency: Duration::from_millis(config.latency_ms),
            jitter_ms: config.jitter_ms,
            response: config.response.clone(),
        }
    }

    fn simulated_delay(&self) -> Duration {
        if self.jitter_ms == 0 {
            return self.latency;
        }
        let jitter = rand::random_range(0..=self.jitter_ms);
        self.latency.saturating_add(Duration::from_millis(jitter))
    }
}

#[async_trait]
impl Responder for DemoResponder {
    fn name(&self) -> &str {
        "demo"
    }

    async fn respond(&self, _prompt: &str, _system_prompt: &str) -> Result<String, ResponderError> {
        sleep(self.simulated_delay()).await;
        Ok(self.response.clone())
    }
}
