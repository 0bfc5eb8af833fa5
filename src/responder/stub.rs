//! Deterministic responder for tests

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::sleep;

use super::{Responder, ResponderError};

/// Replies `prefix + prompt`, failing on configured prompts
pub struct StubResponder {
    prefix: String,
    failing: HashSet<String>,
    fail_all: bool,
    delay: Duration,
    calls: AtomicUsize,
    system_prompts: Mutex<Vec<String>>,
}

impl StubResponder {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            failing: HashSet::new(),
            fail_all: false,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            system_prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, prompt: impl Into<String>) -> Self {
        self.failing.insert(prompt.into());
        self
    }

    pub fn always_failing(mut self) -> Self {
        self.fail_all = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn system_prompts(&self) -> Vec<String> {
        self.system_prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Responder for StubResponder {
    fn name(&self) -> &str {
        "stub"
    }

    async fn respond(&self, prompt: &str, system_prompt: &str) -> Result<String, ResponderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.system_prompts
            .lock()
            .unwrap()
            .push(system_prompt.to_string());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        if self.fail_all || self.failing.contains(prompt) {
            return Err(ResponderError::Api(format!("stub failure for {prompt:?}")));
        }

        Ok(format!("{}{}", self.prefix, prompt))
    }
}
