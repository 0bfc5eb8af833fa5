//! Latency analysis
//!
//! Summary statistics over query results. Percentiles use nearest-rank by
//! index truncation (`sorted[floor(n * p)]`), and the median is the upper
//! median for even-length inputs.

use serde::{Deserialize, Serialize};

use crate::models::QueryResult;

/// Latency distribution statistics (milliseconds)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    /// Number of latency samples
    pub count: usize,
    /// Minimum latency
    pub min: f64,
    /// Maximum latency
    pub max: f64,
    /// Mean latency
    pub mean: f64,
    /// Median latency
    pub median: f64,
    /// 95th percentile
    pub p95: f64,
    /// 99th percentile
    pub p99: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// `1 - (max - min) / sum * count`; 1.0 means perfectly consistent
    pub consistency_score: f64,
    /// Standard deviation divided by mean
    pub coefficient_of_variation: f64,
}

impl LatencyStats {
    /// Calculate statistics from latency samples; zero or negative samples are ignored
    pub fn from_samples(samples: &[f64]) -> Self {
        let mut sorted: Vec<f64> = samples.iter().copied().filter(|l| *l > 0.0).collect();
        if sorted.is_empty() {
            return Self::default();
        }
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let n = sorted.len() as f64;
        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let sum: f64 = sorted.iter().sum();
        let mean = sum / n;

        let variance: f64 = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();

        let consistency_score = if sum > 0.0 {
            1.0 - (max - min) / sum * n
        } else {
            0.0
        };

        let coefficient_of_variation = if mean > 0.0 { std_dev / mean } else { 0.0 };

        Self {
            count: sorted.len(),
            min,
            max,
            mean,
            median: sorted[sorted.len() / 2],
            p95: nearest_rank(&sorted, 0.95),
            p99: nearest_rank(&sorted, 0.99),
            std_dev,
            consistency_score,
            coefficient_of_variation,
        }
    }

    /// Format as summary string
    pub fn format_summary(&self) -> String {
        format!(
            "min={:.2}ms max={:.2}ms median={:.2}ms p95={:.2}ms p99={:.2}ms std={:.2}ms",
            self.min, self.max, self.median, self.p95, self.p99, self.std_dev
        )
    }
}

/// Element at `floor(n * fraction)` of a sorted, non-empty slice
fn nearest_rank(sorted: &[f64], fraction: f64) -> f64 {
    let idx = (sorted.len() as f64 * fraction).floor() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Aggregate over all results of one run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Results in the run
    pub total: usize,
    /// Successful queries
    pub successful: usize,
    /// Failed queries
    pub failed: usize,
    /// Successful / total (0.0 - 1.0)
    pub success_rate: f64,
    /// Mean latency of successful queries in milliseconds
    pub average_latency_ms: f64,
    /// Latency distribution of successful queries
    pub latency: LatencyStats,
    /// Mean response length in characters, over all results
    pub average_response_length: f64,
    /// Rough token estimate over all prompts and responses
    pub estimated_tokens: usize,
}

impl RunSummary {
    /// Format as summary string
    pub fn format_summary(&self) -> String {
        format!(
            "total={} success={} failed={} success_rate={:.1}% avg={:.2}ms",
            self.total,
            self.successful,
            self.failed,
            self.success_rate * 100.0,
            self.average_latency_ms
        )
    }
}

/// Computes run summaries. Stateless; `analyze` has no side effects.
pub struct LatencyAnalyzer;

impl LatencyAnalyzer {
    /// Summarize a set of query results
    pub fn analyze(results: &[QueryResult]) -> RunSummary {
        let total = results.len();
        let successful = results.iter().filter(|r| r.success).count();
        let latencies: Vec<f64> = results.iter().map(|r| r.latency_ms).collect();
        let latency = LatencyStats::from_samples(&latencies);

        let success_rate = if total > 0 {
            successful as f64 / total as f64
        } else {
            0.0
        };

        let average_response_length = if total > 0 {
            results
                .iter()
                .map(|r| r.response.chars().count())
                .sum::<usize>() as f64
                / total as f64
        } else {
            0.0
        };

        RunSummary {
            total,
            successful,
            failed: total - successful,
            success_rate,
            average_latency_ms: latency.mean,
            latency,
            average_response_length,
            estimated_tokens: results.iter().map(QueryResult::estimated_tokens).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QueryItem;

    fn ok(index: usize, latency_ms: f64) -> QueryResult {
        QueryResult::success(&QueryItem::new(index, "q"), "answer text", latency_ms)
    }

    fn failed(index: usize) -> QueryResult {
        QueryResult::failure(&QueryItem::new(index, "q"), "boom")
    }

    #[test]
    fn test_nearest_rank_percentiles() {
        let data: Vec<f64> = (1..=100).map(|x| x as f64).collect();
        let stats = LatencyStats::from_samples(&data);

        assert_eq!(stats.median, 51.0);
        assert_eq!(stats.p95, 96.0);
        assert_eq!(stats.p99, 100.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 100.0);
    }

    #[test]
    fn test_upper_median_for_even_count() {
        let stats = LatencyStats::from_samples(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.p95, 4.0);
        assert_eq!(stats.p99, 4.0);
    }

    #[test]
    fn test_population_std_dev() {
        let stats = LatencyStats::from_samples(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.std_dev, 2.0);
        assert!((stats.coefficient_of_variation - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_consistency_score() {
        let uniform = LatencyStats::from_samples(&[10.0, 10.0, 10.0]);
        assert_eq!(uniform.consistency_score, 1.0);

        let spread = LatencyStats::from_samples(&[10.0, 20.0, 30.0]);
        assert!(spread.consistency_score.abs() < 1e-12);

        let wild = LatencyStats::from_samples(&[1.0, 100.0]);
        assert!(wild.consistency_score < 0.0);
    }

    #[test]
    fn test_constant_latency() {
        let results: Vec<QueryResult> = (1..=7).map(|i| ok(i, 42.5)).collect();
        let summary = LatencyAnalyzer::analyze(&results);
        let l = &summary.latency;

        assert_eq!(l.min, 42.5);
        assert_eq!(l.max, 42.5);
        assert_eq!(l.median, 42.5);
        assert_eq!(l.p95, 42.5);
        assert_eq!(l.p99, 42.5);
        assert_eq!(l.std_dev, 0.0);
        assert_eq!(summary.average_latency_ms, 42.5);
    }

    #[test]
    fn test_failures_excluded_from_latency() {
        let results = vec![ok(1, 10.0), failed(2), ok(3, 30.0)];
        let summary = LatencyAnalyzer::analyze(&results);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.latency.count, 2);
        assert_eq!(summary.latency.min, 10.0);
        assert_eq!(summary.average_latency_ms, 20.0);
    }

    #[test]
    fn test_all_failed() {
        let results: Vec<QueryResult> = (1..=4).map(failed).collect();
        let summary = LatencyAnalyzer::analyze(&results);

        assert_eq!(summary.successful, 0);
        assert_eq!(summary.failed, 4);
        assert_eq!(summary.success_rate, 0.0);
        assert_eq!(summary.latency, LatencyStats::default());
        assert_eq!(summary.average_latency_ms, 0.0);
    }

    #[test]
    fn test_empty_input() {
        let summary = LatencyAnalyzer::analyze(&[]);
        assert_eq!(summary, RunSummary::default());
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let results = vec![ok(1, 12.0), ok(2, 7.5), failed(3), ok(4, 99.0)];
        assert_eq!(
            LatencyAnalyzer::analyze(&results),
            LatencyAnalyzer::analyze(&results)
        );
    }

    #[test]
    fn test_response_length_and_tokens() {
        let results = vec![ok(1, 1.0), ok(2, 2.0)];
        let summary = LatencyAnalyzer::analyze(&results);

        assert_eq!(summary.average_response_length, "answer text".len() as f64);
        // "q" + "answer text" per result
        assert_eq!(summary.estimated_tokens, 6);
    }
}
