//! Scan configuration
//!
//! One immutable `ReconConfig` is built per invocation, from an optional
//! YAML file overlaid with command-line flags, and handed to each component.

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::{BackoffType, StringMap, DEFAULT_USER_AGENT};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default base URL of the VirusTotal UI API
pub const DEFAULT_VIRUSTOTAL_URL: &str = "https://www.virustotal.com";

/// Default base URL of the crt.sh certificate search
pub const DEFAULT_CRTSH_URL: &str = "https://crt.sh";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete scan configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconConfig {
    /// User agent sent unless a header overrides it
    pub user_agent: String,

    /// Extra request headers
    pub headers: StringMap,

    /// Request cookies
    pub cookies: StringMap,

    /// Transport timeout in seconds
    pub timeout_secs: u64,

    /// Retry policy for transient statuses
    pub retry: RetryConfig,

    /// Optional request pacing
    pub rate_limit: Option<RateLimiterConfig>,

    /// Upstream service locations
    pub endpoints: EndpointsConfig,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: StringMap::new(),
            cookies: StringMap::new(),
            timeout_secs: 30,
            retry: RetryConfig::default(),
            rate_limit: None,
            endpoints: EndpointsConfig::default(),
        }
    }
}

impl ReconConfig {
    /// Load a config from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse a config from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be greater than 0"));
        }
        if self.retry.max_backoff_ms < self.retry.initial_backoff_ms {
            return Err(Error::config(
                "retry.max_backoff_ms must not be below retry.initial_backoff_ms",
            ));
        }
        if self.endpoints.virustotal.is_empty() || self.endpoints.crtsh.is_empty() {
            return Err(Error::config("endpoint URLs must not be empty"));
        }
        Ok(())
    }

    /// Headers for a scan, with the configured user agent filled in
    pub fn request_headers(&self) -> StringMap {
        let mut headers = self.headers.clone();
        let has_agent = headers.keys().any(|k| k.eq_ignore_ascii_case("user-agent"));
        if !has_agent {
            headers.insert("User-Agent".to_string(), self.user_agent.clone());
        }
        headers
    }

    /// Build the HTTP client configuration
    pub fn http_client_config(&self) -> HttpClientConfig {
        let builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_retries(self.retry.max_retries)
            .backoff(
                self.retry.backoff,
                Duration::from_millis(self.retry.initial_backoff_ms),
                Duration::from_millis(self.retry.max_backoff_ms),
            )
            .jitter(self.retry.jitter)
            .retry_statuses(self.retry.statuses.clone())
            .user_agent(self.user_agent.clone());

        match &self.rate_limit {
            Some(rate) => builder.rate_limit(rate.clone()).build(),
            None => builder.no_rate_limit().build(),
        }
    }
}

// ============================================================================
// Retry Config
// ============================================================================

/// Bounded retry policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// First backoff delay
    pub initial_backoff_ms: u64,
    /// Backoff cap
    pub max_backoff_ms: u64,
    /// Backoff growth
    pub backoff: BackoffType,
    /// Randomize delays
    pub jitter: bool,
    /// Statuses worth retrying
    pub statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_backoff_ms: 250,
            max_backoff_ms: 10_000,
            backoff: BackoffType::Exponential,
            jitter: true,
            statuses: vec![502],
        }
    }
}

// ============================================================================
// Endpoints
// ============================================================================

/// Base URLs of the third-party services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    pub virustotal: String,
    pub crtsh: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            virustotal: DEFAULT_VIRUSTOTAL_URL.to_string(),
            crtsh: DEFAULT_CRTSH_URL.to_string(),
        }
    }
}

// ============================================================================
// KEY=VALUE parsing
// ============================================================================

/// Parse `FIRST=VALUE;SECOND=VALUE` into a map
///
/// Empty items are skipped and values may themselves contain `=`.
/// Later keys win.
pub fn parse_pairs(raw: &str) -> Result<StringMap> {
    let mut result = StringMap::new();

    for item in raw.split(';') {
        if item.trim().is_empty() {
            continue;
        }

        let (key, value) = item
            .split_once('=')
            .ok_or_else(|| Error::usage(format!("expected KEY=VALUE, got '{item}'")))?;

        let key = key.trim();
        if key.is_empty() {
            return Err(Error::usage(format!("empty key in '{item}'")));
        }

        result.insert(key.to_string(), value.trim().to_string());
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_pairs() {
        let pairs = parse_pairs("FIRST=one;SECOND=two").unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs.get("FIRST"), Some(&"one".to_string()));
        assert_eq!(pairs.get("SECOND"), Some(&"two".to_string()));
    }

    #[test]
    fn test_parse_pairs_empty_and_trailing() {
        assert!(parse_pairs("").unwrap().is_empty());

        let pairs = parse_pairs("a=1;;b=2;").unwrap();
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_parse_pairs_value_with_equals() {
        let pairs = parse_pairs("token=abc==").unwrap();
        assert_eq!(pairs.get("token"), Some(&"abc==".to_string()));
    }

    #[test]
    fn test_parse_pairs_rejects_missing_separator() {
        let err = parse_pairs("a=1;broken").unwrap_err();
        assert!(matches!(err, Error::Usage { .. }));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_parse_pairs_rejects_empty_key() {
        assert!(parse_pairs("=value").is_err());
    }

    #[test]
    fn test_default_config() {
        let config = ReconConfig::default();
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.retry.statuses, vec![502]);
        assert_eq!(config.endpoints.crtsh, DEFAULT_CRTSH_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_request_headers_adds_user_agent() {
        let config = ReconConfig::default();
        let headers = config.request_headers();
        assert_eq!(
            headers.get("User-Agent").map(String::as_str),
            Some(DEFAULT_USER_AGENT)
        );
    }

    #[test]
    fn test_request_headers_keeps_explicit_user_agent() {
        let config = ReconConfig {
            headers: parse_pairs("user-agent=custom/1.0").unwrap(),
            ..Default::default()
        };
        let headers = config.request_headers();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("user-agent"), Some(&"custom/1.0".to_string()));
    }

    #[test]
    fn test_from_yaml_partial() {
        let yaml = r"
timeout_secs: 5
headers:
  X-Test: yes-please
retry:
  max_retries: 2
rate_limit:
  requests_per_second: 4
endpoints:
  crtsh: http://localhost:9999
";
        let config = ReconConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.headers.get("X-Test"), Some(&"yes-please".to_string()));
        assert_eq!(config.retry.max_retries, 2);
        assert_eq!(config.retry.initial_backoff_ms, 250);
        assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(4, 1)));
        assert_eq!(config.endpoints.crtsh, "http://localhost:9999");
        assert_eq!(config.endpoints.virustotal, DEFAULT_VIRUSTOTAL_URL);
    }

    #[test]
    fn test_from_yaml_rejects_zero_timeout() {
        let err = ReconConfig::from_yaml("timeout_secs: 0").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_from_yaml_invalid() {
        let err = ReconConfig::from_yaml("retry: [1, 2]").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "user_agent: recon-test/0.1").unwrap();

        let config = ReconConfig::load(file.path()).unwrap();
        assert_eq!(config.user_agent, "recon-test/0.1");
    }

    #[test]
    fn test_load_missing_file() {
        let err = ReconConfig::load("/nonexistent/webrecon.yaml").unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn test_http_client_config_mapping() {
        let config = ReconConfig {
            timeout_secs: 7,
            rate_limit: Some(RateLimiterConfig::per_second(3)),
            ..Default::default()
        };
        let http = config.http_client_config();
        assert_eq!(http.timeout, Duration::from_secs(7));
        assert_eq!(http.max_retries, 5);
        assert_eq!(http.initial_backoff, Duration::from_millis(250));
        assert_eq!(http.rate_limit, Some(RateLimiterConfig::per_second(3)));
    }
}
