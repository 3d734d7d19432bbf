//! HTTP client module
//!
//! Transport for the backend indexing API.
//!
//! # Features
//!
//! - **Automatic Retries**: 5xx, 429, timeouts and connect errors are retried with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Ordered Query Strings**: cursors are sent back in the order they were received

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
