//! HTTP client with bounded retry and rate limiting
//!
//! Provides the request primitive shared by every scan:
//! - `run` captures one exchange as a `RequestResult` and never fails
//! - `request` / `get` propagate transport errors for single-shot fetches
//! - `get_with_retry` retries transient statuses with jittered backoff

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use super::result::RequestResult;
use crate::error::{Error, Result};
use crate::types::{BackoffType, HttpMethod, StringMap, DEFAULT_USER_AGENT};
use rand::Rng;
use reqwest::header::COOKIE;
use reqwest::{Client, Method, RequestBuilder, Response};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of retries for retryable statuses
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
    /// Randomize each delay within `[delay / 2, delay]`
    pub jitter: bool,
    /// Statuses that trigger a retry in `get_with_retry`
    pub retry_statuses: Vec<u16>,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 5,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(10),
            backoff_type: BackoffType::Exponential,
            jitter: true,
            retry_statuses: vec![502],
            rate_limit: None,
            default_headers: HashMap::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Enable or disable jitter
    pub fn jitter(mut self, jitter: bool) -> Self {
        self.config.jitter = jitter;
        self
    }

    /// Replace the set of retryable statuses
    pub fn retry_statuses(mut self, statuses: Vec<u16>) -> Self {
        self.config.retry_statuses = statuses;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters
    pub query: Vec<(String, String)>,
    /// Request headers
    pub headers: StringMap,
    /// Cookies, sent as a single `Cookie` header
    pub cookies: StringMap,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a request config carrying headers and cookies
    pub fn with_headers_and_cookies(headers: &StringMap, cookies: &StringMap) -> Self {
        Self {
            query: Vec::new(),
            headers: headers.clone(),
            cookies: cookies.clone(),
        }
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a cookie
    #[must_use]
    pub fn cookie(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(key.into(), value.into());
        self
    }

    /// Render cookies as a `Cookie` header value, sorted by name
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }

        let mut pairs: Vec<_> = self.cookies.iter().collect();
        pairs.sort();
        Some(
            pairs
                .into_iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// HTTP client with bounded retry and rate limiting
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Issue exactly one request and capture its outcome
    ///
    /// Any completed exchange is a success regardless of status code.
    /// Transport failures (and unusable input such as a malformed URL)
    /// are captured as a classified `Failure`; this never returns an error.
    pub async fn run(
        &self,
        url: &str,
        method: HttpMethod,
        headers: &StringMap,
        cookies: &StringMap,
    ) -> RequestResult {
        let verb = match method.to_reqwest() {
            Ok(verb) => verb,
            Err(message) => return RequestResult::failure(message),
        };

        let config = RequestConfig::with_headers_and_cookies(headers, cookies);
        let response = match self.execute(verb, url, &config).await {
            Ok(response) => response,
            Err(e) => {
                debug!("{} {} failed: {}", method, url, e);
                return RequestResult::from_error(&e);
            }
        };

        let status = response.status().as_u16();
        match response.bytes().await {
            Ok(body) => RequestResult::success(status, body.len()),
            Err(e) => RequestResult::from_error(&e),
        }
    }

    /// Make a single request, propagating transport errors
    pub async fn request(&self, method: Method, url: &str, config: &RequestConfig) -> Result<Response> {
        Ok(self.execute(method, url, config).await?)
    }

    /// Make a single GET request
    pub async fn get(&self, url: &str, config: &RequestConfig) -> Result<Response> {
        self.request(Method::GET, url, config).await
    }

    /// Make a GET request, retrying retryable statuses up to `max_retries` times
    ///
    /// Fails with `MaxRetriesExceeded` once the bound is reached. Transport
    /// errors are not retried.
    pub async fn get_with_retry(&self, url: &str, config: &RequestConfig) -> Result<Response> {
        let max_retries = self.config.max_retries;
        let mut attempt = 0;

        loop {
            let response = self.get(url, config).await?;
            let status = response.status().as_u16();

            if !self.config.retry_statuses.contains(&status) {
                debug!("GET {} -> {}", url, status);
                return Ok(response);
            }

            if attempt >= max_retries {
                return Err(Error::MaxRetriesExceeded {
                    max_retries,
                    status,
                });
            }

            let delay = self.retry_delay(attempt);
            warn!(
                "Request failed with {}, attempt {}/{}, retrying in {:?}",
                status,
                attempt + 1,
                max_retries + 1,
                delay
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Calculate backoff delay for a given attempt
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let delay = match self.config.backoff_type {
            BackoffType::Constant => self.config.initial_backoff,
            BackoffType::Linear => self.config.initial_backoff * (attempt + 1),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                self.config.initial_backoff.saturating_mul(factor)
            }
        };

        std::cmp::min(delay, self.config.max_backoff)
    }

    /// Backoff for an attempt with jitter applied when enabled
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let delay = self.calculate_backoff(attempt);
        if !self.config.jitter {
            return delay;
        }

        let millis = delay.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(millis / 2..=millis))
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        config: &RequestConfig,
    ) -> std::result::Result<Response, reqwest::Error> {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        self.build_request(method, url, config).send().await
    }

    fn build_request(&self, method: Method, url: &str, config: &RequestConfig) -> RequestBuilder {
        let mut req = self.client.request(method, url);

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        for (key, value) in &config.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if let Some(cookie) = config.cookie_header() {
            req = req.header(COOKIE, cookie);
        }

        if !config.query.is_empty() {
            req = req.query(&config.query);
        }

        req
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}
