//! Common types used throughout webrecon
//!
//! This module contains shared type definitions, type aliases,
//! and constants used across multiple scans.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// Generic key-value map with string keys and values (headers, cookies)
pub type StringMap = HashMap<String, String>;

/// Deduplicated, ordered set of discovered identifiers (domains, URLs)
pub type ResultSet = BTreeSet<String>;

// ============================================================================
// User Agents
// ============================================================================

/// User-Agent sent with every request unless overridden
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:15.0) Gecko/20100101 Firefox/15.0.1";

/// Pool of browser User-Agents rotated for the listing API
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Linux; Android 8.0.0; SM-G960F Build/R16NW) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/62.0.3202.84 Mobile Safari/537.36",
    "Mozilla/5.0 (Linux; Android 6.0.1; Nexus 6P Build/MMB29P) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/47.0.2526.83 Mobile Safari/537.36",
    "Mozilla/5.0 (Linux; Android 6.0; HTC One M9 Build/MRA58K) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/52.0.2743.98 Mobile Safari/537.3",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_11_2) AppleWebKit/601.3.9 (KHTML, like Gecko) Version/9.0.2 Safari/601.3.9",
    "Mozilla/5.0 (Windows NT 6.1; WOW64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/47.0.2526.111 Safari/537.36",
    DEFAULT_USER_AGENT,
];

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method probed by the scans
///
/// `SETTINGS` is not a registered HTTP verb and goes out as a custom method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
    SETTINGS,
    HEAD,
    CONNECT,
    OPTIONS,
    TRACE,
}

impl HttpMethod {
    /// Methods probed by default
    pub const STANDARD: [HttpMethod; 5] = [
        HttpMethod::GET,
        HttpMethod::POST,
        HttpMethod::PUT,
        HttpMethod::PATCH,
        HttpMethod::DELETE,
    ];

    /// Methods added by the extended probe set
    pub const EXTRA: [HttpMethod; 5] = [
        HttpMethod::SETTINGS,
        HttpMethod::HEAD,
        HttpMethod::CONNECT,
        HttpMethod::OPTIONS,
        HttpMethod::TRACE,
    ];

    /// Methods to probe, optionally including the extended set
    pub fn probe_set(extended: bool) -> Vec<HttpMethod> {
        let mut methods = Self::STANDARD.to_vec();
        if extended {
            methods.extend_from_slice(&Self::EXTRA);
        }
        methods
    }

    /// Wire name of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::SETTINGS => "SETTINGS",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::CONNECT => "CONNECT",
            HttpMethod::OPTIONS => "OPTIONS",
            HttpMethod::TRACE => "TRACE",
        }
    }

    /// Convert to the transport's method type
    ///
    /// Registered verbs map directly; custom verbs go through token validation.
    pub fn to_reqwest(self) -> Result<reqwest::Method, String> {
        match self {
            HttpMethod::GET => Ok(reqwest::Method::GET),
            HttpMethod::POST => Ok(reqwest::Method::POST),
            HttpMethod::PUT => Ok(reqwest::Method::PUT),
            HttpMethod::PATCH => Ok(reqwest::Method::PATCH),
            HttpMethod::DELETE => Ok(reqwest::Method::DELETE),
            HttpMethod::HEAD => Ok(reqwest::Method::HEAD),
            HttpMethod::CONNECT => Ok(reqwest::Method::CONNECT),
            HttpMethod::OPTIONS => Ok(reqwest::Method::OPTIONS),
            HttpMethod::TRACE => Ok(reqwest::Method::TRACE),
            HttpMethod::SETTINGS => {
                reqwest::Method::from_bytes(self.as_str().as_bytes()).map_err(|e| e.to_string())
            }
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Padding flags (`{:8}`) are honoured for the scan report columns
        f.pad(self.as_str())
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_set() {
        assert_eq!(HttpMethod::probe_set(false), HttpMethod::STANDARD.to_vec());

        let extended = HttpMethod::probe_set(true);
        assert_eq!(extended.len(), 10);
        assert_eq!(extended[5], HttpMethod::SETTINGS);
        assert_eq!(extended[9], HttpMethod::TRACE);
    }

    #[test]
    fn test_method_conversion() {
        assert_eq!(HttpMethod::GET.to_reqwest().unwrap(), reqwest::Method::GET);

        let settings = HttpMethod::SETTINGS.to_reqwest().unwrap();
        assert_eq!(settings.as_str(), "SETTINGS");
    }

    #[test]
    fn test_method_display_padding() {
        assert_eq!(format!("{:8}|", HttpMethod::GET), "GET     |");
        assert_eq!(format!("{}", HttpMethod::OPTIONS), "OPTIONS");
    }

    #[test]
    fn test_backoff_serde() {
        let backoff: BackoffType = serde_json::from_str("\"linear\"").unwrap();
        assert_eq!(backoff, BackoffType::Linear);
        assert_eq!(BackoffType::default(), BackoffType::Exponential);
    }

    #[test]
    fn test_user_agent_pool_contains_default() {
        assert!(USER_AGENTS.contains(&DEFAULT_USER_AGENT));
    }
}
