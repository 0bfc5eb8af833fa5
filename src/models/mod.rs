//! Data models for batch querying
//!
//! This module contains the query data structures and the built-in prompt set.

mod prompts;
mod query;

pub use prompts::{load_prompts_file, PromptCategory, BUILTIN_PROMPTS};
pub use query::{QueryItem, QueryResult};
#[cfg(test)]
pub use query::ERROR_MARKER;
