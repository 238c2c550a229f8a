//! HTTP client module
//!
//! Provides the request runner shared by all scans.
//!
//! # Features
//!
//! - **Uniform capture**: every request becomes a `RequestResult`
//! - **Bounded retries**: transient statuses retried with jittered backoff
//! - **Rate limiting**: optional token bucket rate limiter using governor

mod client;
mod rate_limit;
mod result;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use result::{classify_message, error_chain_text, RequestResult};
