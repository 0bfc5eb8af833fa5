//! Run report generation
//!
//! Assembles a run's results and summary into a report and renders it as
//! text, JSON, Markdown or CSV.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use super::analyzer::{LatencyAnalyzer, RunSummary};
use crate::config::ConfigError;
use crate::models::QueryResult;

/// Above this standard deviation (ms) latency is reported as highly variable
const HIGH_VARIABILITY_STD_MS: f64 = 50.0;

/// Success rate (0.0 - 1.0) required for a production-ready verdict
const PRODUCTION_SUCCESS_RATE: f64 = 0.95;

/// Consistency score required for a consistent-latency verdict
const CONSISTENT_SCORE: f64 = 0.7;

/// Results shown at each end of the text sample view
const SAMPLE_EDGE: usize = 3;

/// Report output format
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    /// Plain text report
    Text,
    /// JSON format
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// Markdown format
    Markdown,
    /// CSV, one row per query
    Csv,
}

impl std::str::FromStr for ReportFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "table" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "json-pretty" | "jsonpretty" => Ok(Self::JsonPretty),
            "markdown" | "md" => Ok(Self::Markdown),
            "csv" => Ok(Self::Csv),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

/// Settings and environment a run was executed with
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunEnvironment {
    /// Responder name
    pub responder: String,
    /// Model name
    pub model: String,
    /// Whether the API key was configured
    pub api_key_set: bool,
    /// Whether the account ID was configured
    pub account_id_set: bool,
    /// Offline demo mode
    pub demo_mode: bool,
    /// Delay between queries in seconds
    pub delay_secs: f64,
    /// Queries per batch
    pub batch_size: usize,
}

/// Recommendation line in a report
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub ok: bool,
    pub message: String,
}

impl Recommendation {
    fn new(ok: bool, message: impl Into<String>) -> Self {
        Self {
            ok,
            message: message.into(),
        }
    }

    fn tag(&self) -> &'static str {
        if self.ok {
            "[SUCCESS]"
        } else {
            "[WARNING]"
        }
    }
}

/// Complete report for one run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique run ID
    pub id: String,
    /// Report creation time
    pub generated_at: DateTime<Utc>,
    /// Run settings
    pub environment: RunEnvironment,
    /// Number of prompts submitted
    pub requested: usize,
    /// Whether the run was cancelled before all prompts completed
    pub cancelled: bool,
    /// Wall-clock duration of the whole run in seconds
    pub total_duration_secs: f64,
    /// Aggregate statistics
    pub summary: RunSummary,
    /// Per-query results in submission order
    pub results: Vec<QueryResult>,
}

impl RunReport {
    /// Build a report from a finished run
    pub fn new(
        environment: RunEnvironment,
        requested: usize,
        results: Vec<QueryResult>,
        total_duration_secs: f64,
    ) -> Self {
        let summary = LatencyAnalyzer::analyze(&results);
        Self {
            id: generate_run_id(),
            generated_at: Utc::now(),
            environment,
            requested,
            cancelled: results.len() < requested,
            total_duration_secs,
            summary,
            results,
        }
    }

    /// Processed queries per second of wall-clock time
    pub fn throughput(&self) -> f64 {
        if self.total_duration_secs > 0.0 {
            self.summary.total as f64 / self.total_duration_secs
        } else {
            0.0
        }
    }

    /// Observations about the run
    pub fn insights(&self) -> Vec<String> {
        let s = &self.summary;
        let variability = if s.latency.std_dev > HIGH_VARIABILITY_STD_MS {
            "high"
        } else {
            "good"
        };

        let mut insights = vec![format!("Response times show {variability} consistency")];
        if s.failed == 0 {
            insights.push("Network connectivity is stable".to_string());
        } else {
            insights.push(format!("{} connectivity issues detected", s.failed));
        }
        insights.push(format!(
            "Average processing rate: {:.2} questions/second",
            self.throughput()
        ));
        if self.cancelled {
            insights.push(format!(
                "Run was interrupted after {}/{} questions",
                s.total, self.requested
            ));
        }
        insights
    }

    /// Verdicts derived from success rate, consistency and failures
    pub fn recommendations(&self) -> Vec<Recommendation> {
        let s = &self.summary;
        vec![
            if s.success_rate > PRODUCTION_SUCCESS_RATE {
                Recommendation::new(true, "Production ready - all systems operational")
            } else {
                Recommendation::new(false, "Review connectivity issues before production use")
            },
            if s.latency.consistency_score > CONSISTENT_SCORE {
                Recommendation::new(true, "Response times are consistent and acceptable")
            } else {
                Recommendation::new(false, "Response time variability detected")
            },
            if s.failed == 0 {
                Recommendation::new(true, "All questions processed successfully")
            } else {
                Recommendation::new(
                    false,
                    format!("{} questions had connectivity issues", s.failed),
                )
            },
        ]
    }
}

/// Generate unique run ID
fn generate_run_id() -> String {
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let random: u32 = rand::random::<u32>() % 10000;
    format!("{timestamp}_{random:04}")
}

/// Renders run reports
pub struct ReportRenderer {
    format: ReportFormat,
    show_all: bool,
}

impl ReportRenderer {
    pub fn new(format: ReportFormat) -> Self {
        Self {
            format,
            show_all: false,
        }
    }

    /// List every result in text output instead of a sample
    pub fn show_all(mut self, show_all: bool) -> Self {
        self.show_all = show_all;
        self
    }

    /// Render a report
    pub fn render(&self, report: &RunReport) -> Result<String> {
        Ok(match self.format {
            ReportFormat::Text => self.text(report),
            ReportFormat::Json => {
                serde_json::to_string(report).context("Failed to serialize report")?
            }
            ReportFormat::JsonPretty => {
                serde_json::to_string_pretty(report).context("Failed to serialize report")?
            }
            ReportFormat::Markdown => Self::markdown(report),
            ReportFormat::Csv => Self::csv(report)?,
        })
    }

    /// Render a report and write it to a file
    pub fn write_to(&self, report: &RunReport, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = self.render(report)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        info!("Exported report to {}", path.display());
        Ok(())
    }

    /// One result in text form
    pub fn format_result(result: &QueryResult) -> String {
        format!(
            "Question {}: {}\nResponse Time: {:.2} ms\nAnswer: {}\n\n{}\n",
            result.index,
            result.prompt,
            result.latency_ms,
            result.response,
            "=".repeat(80)
        )
    }

    /// Results shown in text output
    fn sample<'a>(&self, results: &'a [QueryResult]) -> (Vec<&'a QueryResult>, bool) {
        if self.show_all || results.len() <= SAMPLE_EDGE * 2 {
            return (results.iter().collect(), false);
        }
        let head = results.iter().take(SAMPLE_EDGE);
        let tail = results.iter().skip(results.len() - SAMPLE_EDGE);
        (head.chain(tail).collect(), true)
    }

    fn text(&self, report: &RunReport) -> String {
        let s = &report.summary;
        let l = &s.latency;
        let e = &report.environment;
        let rule = "-".repeat(50);
        let mut output = String::new();

        let (shown, truncated) = self.sample(&report.results);
        if !shown.is_empty() {
            output.push_str(&format!("\n{:=^100}\n", " QUERY RESULTS "));
            for (i, result) in shown.iter().enumerate() {
                if truncated && i == SAMPLE_EDGE {
                    output.push_str(&format!(
                        "... [{} results truncated, use --show-all] ...\n\n",
                        report.results.len() - SAMPLE_EDGE * 2
                    ));
                }
                output.push_str(&Self::format_result(result));
            }
        }

        output.push_str(&format!("\n{:=^100}\n", " QUERY ANALYSIS REPORT "));
        output.push_str(&format!("Run ID: {}\n", report.id));
        output.push_str(&format!(
            "Generated: {}\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        output.push_str(&format!("\nEXECUTION SUMMARY\n{rule}\n"));
        output.push_str(&format!(
            "Total Questions Processed: {}/{}\n",
            s.total, report.requested
        ));
        output.push_str(&format!(
            "Total Execution Time: {:.2} seconds\n",
            report.total_duration_secs
        ));
        output.push_str(&format!("Successful Queries: {}\n", s.successful));
        output.push_str(&format!("Connectivity Issues: {}\n", s.failed));
        output.push_str(&format!("Success Rate: {:.1}%\n", s.success_rate * 100.0));

        output.push_str(&format!("\nPERFORMANCE METRICS\n{rule}\n"));
        output.push_str(&format!(
            "Average Response Time: {:.2} ms\n",
            s.average_latency_ms
        ));
        output.push_str(&format!(
            "Average Answer Length: {:.0} characters\n",
            s.average_response_length
        ));
        output.push_str(&format!("Estimated Total Tokens: {}\n", s.estimated_tokens));

        output.push_str(&format!("\nLATENCY ANALYSIS\n{rule}\n"));
        output.push_str(&format!("Minimum Latency: {:.2} ms\n", l.min));
        output.push_str(&format!("Maximum Latency: {:.2} ms\n", l.max));
        output.push_str(&format!("Median Latency: {:.2} ms\n", l.median));
        output.push_str(&format!("95th Percentile: {:.2} ms\n", l.p95));
        output.push_str(&format!("99th Percentile: {:.2} ms\n", l.p99));
        output.push_str(&format!("Standard Deviation: {:.2} ms\n", l.std_dev));
        output.push_str(&format!(
            "Consistency Score: {:.3} (1.0 = perfectly consistent)\n",
            l.consistency_score
        ));
        output.push_str(&format!(
            "Coefficient of Variation: {:.3}\n",
            l.coefficient_of_variation
        ));

        output.push_str(&format!("\nENVIRONMENT CONFIGURATION\n{rule}\n"));
        output.push_str(&format!("Responder: {}\n", e.responder));
        output.push_str(&format!("API Key: {}\n", set_label(e.api_key_set)));
        output.push_str(&format!("Account ID: {}\n", set_label(e.account_id_set)));
        output.push_str(&format!("LLM Model: {}\n", e.model));
        output.push_str(&format!(
            "Demo Mode: {}\n",
            if e.demo_mode { "Yes" } else { "No" }
        ));
        output.push_str(&format!(
            "Delay: {}s | Batch Size: {}\n",
            e.delay_secs, e.batch_size
        ));

        output.push_str(&format!("\nANALYTICS INSIGHTS\n{rule}\n"));
        for insight in report.insights() {
            output.push_str(&format!("• {insight}\n"));
        }

        output.push_str(&format!("\nRECOMMENDATIONS\n{rule}\n"));
        for rec in report.recommendations() {
            output.push_str(&format!("{} {}\n", rec.tag(), rec.message));
        }

        output.push_str(&format!("\n{:=^100}\n", ""));
        output
    }

    fn markdown(report: &RunReport) -> String {
        let s = &report.summary;
        let l = &s.latency;
        let mut output = String::new();

        output.push_str(&format!("# Query Analysis Report `{}`\n\n", report.id));
        output.push_str("## Summary\n\n");
        output.push_str("| Metric | Value |\n");
        output.push_str("|--------|-------|\n");
        output.push_str(&format!(
            "| Processed | {}/{} |\n",
            s.total, report.requested
        ));
        output.push_str(&format!("| Successful | {} |\n", s.successful));
        output.push_str(&format!("| Failed | {} |\n", s.failed));
        output.push_str(&format!(
            "| Success Rate | {:.1}% |\n",
            s.success_rate * 100.0
        ));
        output.push_str(&format!(
            "| Execution Time | {:.2} s |\n",
            report.total_duration_secs
        ));
        output.push_str(&format!(
            "| Model | `{}` |\n",
            report.environment.model
        ));

        output.push_str("\n## Latency (milliseconds)\n\n");
        output.push_str("| Statistic | Value |\n");
        output.push_str("|-----------|-------|\n");
        output.push_str(&format!("| Min | {:.2} |\n", l.min));
        output.push_str(&format!("| Median | {:.2} |\n", l.median));
        output.push_str(&format!("| P95 | {:.2} |\n", l.p95));
        output.push_str(&format!("| P99 | {:.2} |\n", l.p99));
        output.push_str(&format!("| Max | {:.2} |\n", l.max));
        output.push_str(&format!("| Mean | {:.2} |\n", l.mean));
        output.push_str(&format!("| Std Dev | {:.2} |\n", l.std_dev));
        output.push_str(&format!(
            "| Consistency Score | {:.3} |\n",
            l.consistency_score
        ));

        output.push_str("\n## Results\n\n");
        output.push_str("| # | Status | Latency (ms) | Question |\n");
        output.push_str("|---|--------|--------------|----------|\n");
        for r in &report.results {
            output.push_str(&format!(
                "| {} | {} | {:.2} | {} |\n",
                r.index,
                r.symbol(),
                r.latency_ms,
                r.prompt.replace('|', "\\|")
            ));
        }

        output.push_str("\n## Recommendations\n\n");
        for rec in report.recommendations() {
            output.push_str(&format!("- {} {}\n", rec.tag(), rec.message));
        }

        output
    }

    fn csv(report: &RunReport) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["index", "success", "latency_ms", "prompt", "response"])?;

        for r in &report.results {
            writer.write_record([
                r.index.to_string(),
                r.success.to_string(),
                format!("{:.3}", r.latency_ms),
                r.prompt.clone(),
                r.response.clone(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV: {e}"))?;
        String::from_utf8(bytes).context("CSV output is not valid UTF-8")
    }
}

fn set_label(set: bool) -> &'static str {
    if set {
        "Set"
    } else {
        "Not Set"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QueryItem;
    use tempfile::tempdir;

    fn environment() -> RunEnvironment {
        RunEnvironment {
            responder: "stub".to_string(),
            model: "@cf/test".to_string(),
            api_key_set: false,
            account_id_set: true,
            demo_mode: true,
            delay_secs: 0.5,
            batch_size: 10,
        }
    }

    fn results(n: usize, failing: &[usize]) -> Vec<QueryResult> {
        (1..=n)
            .map(|i| {
                let item = QueryItem::new(i, format!("question {i}"));
                if failing.contains(&i) {
                    QueryResult::failure(&item, "timeout")
                } else {
                    QueryResult::success(&item, format!("answer, {i}"), 100.0)
                }
            })
            .collect()
    }

    #[test]
    fn test_report_format_from_str() {
        assert_eq!("text".parse(), Ok(ReportFormat::Text));
        assert_eq!("json".parse(), Ok(ReportFormat::Json));
        assert_eq!("JSON-PRETTY".parse(), Ok(ReportFormat::JsonPretty));
        assert_eq!("md".parse(), Ok(ReportFormat::Markdown));
        assert_eq!("csv".parse(), Ok(ReportFormat::Csv));
        assert_eq!(
            "html".parse::<ReportFormat>(),
            Err(ConfigError::UnknownFormat("html".to_string()))
        );
    }

    #[test]
    fn test_report_marks_cancelled_runs() {
        let report = RunReport::new(environment(), 5, results(3, &[]), 1.5);
        assert!(report.cancelled);
        assert_eq!(report.summary.total, 3);
        assert_eq!(report.throughput(), 2.0);
        assert!(report.insights().iter().any(|i| i.contains("interrupted")));

        let full = RunReport::new(environment(), 3, results(3, &[]), 0.0);
        assert!(!full.cancelled);
        assert_eq!(full.throughput(), 0.0);
    }

    #[test]
    fn test_recommendations() {
        let healthy = RunReport::new(environment(), 4, results(4, &[]), 1.0);
        assert!(healthy.recommendations().iter().all(|r| r.ok));

        let flaky = RunReport::new(environment(), 4, results(4, &[2]), 1.0);
        let recs = flaky.recommendations();
        assert!(!recs[0].ok);
        assert!(recs[1].ok);
        assert_eq!(recs[2].message, "1 questions had connectivity issues");
    }

    #[test]
    fn test_text_sample_view() {
        let report = RunReport::new(environment(), 10, results(10, &[]), 1.0);

        let sampled = ReportRenderer::new(ReportFormat::Text)
            .render(&report)
            .unwrap();
        assert!(sampled.contains("Question 3: question 3"));
        assert!(!sampled.contains("Question 5: question 5"));
        assert!(sampled.contains("Question 8: question 8"));
        assert!(sampled.contains("4 results truncated"));
        assert!(sampled.contains("API Key: Not Set"));
        assert!(sampled.contains("Account ID: Set"));

        let full = ReportRenderer::new(ReportFormat::Text)
            .show_all(true)
            .render(&report)
            .unwrap();
        assert!(full.contains("Question 5: question 5"));
        assert!(!full.contains("truncated"));
    }

    #[test]
    fn test_json_round_trip() {
        let report = RunReport::new(environment(), 2, results(2, &[2]), 1.0);
        let json = ReportRenderer::new(ReportFormat::Json)
            .render(&report)
            .unwrap();

        let parsed: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, report.id);
        assert_eq!(parsed.summary, report.summary);
        assert_eq!(parsed.results, report.results);
    }

    #[test]
    fn test_csv_rows_quoted() {
        let report = RunReport::new(environment(), 2, results(2, &[]), 1.0);
        let csv = ReportRenderer::new(ReportFormat::Csv)
            .render(&report)
            .unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "index,success,latency_ms,prompt,response");
        assert_eq!(lines[1], "1,true,100.000,question 1,\"answer, 1\"");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_markdown_escapes_pipes() {
        let item = QueryItem::new(1, "a | b");
        let report = RunReport::new(
            environment(),
            1,
            vec![QueryResult::success(&item, "ok", 5.0)],
            1.0,
        );
        let md = ReportRenderer::new(ReportFormat::Markdown)
            .render(&report)
            .unwrap();
        assert!(md.contains("a \\| b"));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("report.md");
        let report = RunReport::new(environment(), 1, results(1, &[]), 1.0);

        ReportRenderer::new(ReportFormat::Markdown)
            .write_to(&report, &path)
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Query Analysis Report"));
    }
}
