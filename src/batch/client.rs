//! Batch query execution
//!
//! Sends prompts to a responder strictly one at a time with a fixed pause
//! between items, and reports progress after every batch.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::models::{QueryItem, QueryResult};
use crate::responder::Responder;
use crate::utils::Timer;

/// Progress after a completed batch
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchProgress {
    /// 1-based batch number
    pub batch: usize,
    /// Number of batches in the run
    pub total_batches: usize,
    /// Items completed so far
    pub completed: usize,
    /// Items in the run
    pub total: usize,
}

impl BatchProgress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.completed as f64 / self.total as f64 * 100.0
        }
    }
}

/// Receives progress notifications. Fire-and-forget.
pub trait ProgressSink: Send + Sync {
    fn on_batch_complete(&self, progress: &BatchProgress);
}

/// Progress sink that logs through tracing
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn on_batch_complete(&self, progress: &BatchProgress) {
        info!(
            "Batch {}/{} complete: {}/{} queries ({:.1}%)",
            progress.batch,
            progress.total_batches,
            progress.completed,
            progress.total,
            progress.percent()
        );
    }
}

/// Sequential, paced query client
pub struct BatchQueryClient {
    responder: Arc<dyn Responder>,
    system_prompt: String,
    progress: Arc<dyn ProgressSink>,
    cancel: CancellationToken,
}

impl BatchQueryClient {
    /// Create a new client
    pub fn new(responder: Arc<dyn Responder>, system_prompt: impl Into<String>) -> Self {
        Self {
            responder,
            system_prompt: system_prompt.into(),
            progress: Arc::new(LogProgress),
            cancel: CancellationToken::new(),
        }
    }

    /// Set progress sink
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Attach a cancellation token
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Submit prompts in order, pausing `delay` between items.
    ///
    /// Returns one result per prompt in submission order. A failed call becomes
    /// a failed result and the run continues. If the cancellation token fires,
    /// the in-flight call is abandoned and only completed results are returned.
    pub async fn submit<S: AsRef<str>>(
        &self,
        prompts: &[S],
        delay: Duration,
        batch_size: usize,
    ) -> Vec<QueryResult> {
        let items = QueryItem::sequence(prompts.iter().map(|p| p.as_ref()));
        let total = items.len();
        let batch_size = batch_size.max(1);
        let total_batches = total.div_ceil(batch_size);
        let mut results = Vec::with_capacity(total);

        info!(
            "Submitting {} queries to {} in {} batch(es), {:?} delay",
            total,
            self.responder.name(),
            total_batches,
            delay
        );

        'batches: for (batch_idx, batch) in items.chunks(batch_size).enumerate() {
            let first = batch.first().map(|i| i.index).unwrap_or(0);
            let last = batch.last().map(|i| i.index).unwrap_or(0);
            info!("Processing batch {}: queries {}-{}", batch_idx + 1, first, last);

            for item in batch {
                let Some(result) = self.query_one(item).await else {
                    break 'batches;
                };
                results.push(result);

                if !delay.is_zero() && item.index < total {
                    tokio::select! {
                        biased;
                        _ = self.cancel.cancelled() => break 'batches,
                        _ = sleep(delay) => {}
                    }
                }
            }

            self.progress.on_batch_complete(&BatchProgress {
                batch: batch_idx + 1,
                total_batches,
                completed: results.len(),
                total,
            });
        }

        if results.len() < total {
            warn!(
                "Run cancelled after {}/{} queries; remaining queries skipped",
                results.len(),
                total
            );
        } else {
            info!("Batch processing completed");
        }

        results
    }

    /// Run a single query. `None` means the run was cancelled.
    async fn query_one(&self, item: &QueryItem) -> Option<QueryResult> {
        if self.cancel.is_cancelled() {
            return None;
        }

        debug!(
            "Querying question {}: {}",
            item.index,
            item.prompt.chars().take(50).collect::<String>()
        );

        let timer = Timer::start(format!("query {}", item.index));
        let outcome = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return None,
            outcome = self.responder.respond(&item.prompt, &self.system_prompt) => outcome,
        };

        match outcome {
            Ok(response) => {
                let latency_ms = timer.stop();
                info!("Question {} answered in {:.2}ms", item.index, latency_ms);
                Some(QueryResult::success(item, response, latency_ms))
            }
            Err(e) => {
                warn!("Connectivity issue for question {}: {}", item.index, e);
                Some(QueryResult::failure(item, e))
            }
        }
    }
}
