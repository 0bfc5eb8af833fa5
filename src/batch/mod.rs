//! Batch querying and latency analytics
//!
//! Paced sequential submission of prompts, summary statistics over the
//! results, and report rendering.

mod analyzer;
mod client;
mod report;

pub use client::{BatchQueryClient, LogProgress};
pub use report::{ReportFormat, ReportRenderer, RunEnvironment, RunReport};
