//! HTTP client module for inference API calls

mod client;

pub use client::{HttpClient, HttpError};
