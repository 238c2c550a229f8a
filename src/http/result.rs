//! Request outcome captured by the runner
//!
//! A `RequestResult` is either a completed HTTP exchange (any status) or a
//! transport failure reduced to a short, human readable message.

use regex::Regex;
use serde::Serialize;
use std::error::Error as StdError;
use std::sync::LazyLock;

/// Errno-style rendering: `[Errno 111] Connection refused'`
static ERRNO_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Errno.*\]\s(.*)'").unwrap());

/// Rust io rendering: `Connection refused (os error 111)`
static OS_ERROR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^:]+?)\s\(os error \d+\)").unwrap());

/// Outcome of a single HTTP request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RequestResult {
    /// The exchange completed; the status code may still be 4xx/5xx
    Success {
        /// HTTP status code
        status_code: u16,
        /// Body length in bytes
        body_size: usize,
    },
    /// The request never produced a response
    Failure {
        /// Classified failure message
        message: String,
    },
}

impl RequestResult {
    /// Create a success result
    pub fn success(status_code: u16, body_size: usize) -> Self {
        Self::Success {
            status_code,
            body_size,
        }
    }

    /// Create a failure from an already classified message
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    /// Create a failure from a transport error, classifying its message
    pub fn from_error(err: &(dyn StdError + 'static)) -> Self {
        Self::failure(classify_message(&error_chain_text(err)))
    }

    /// Check if the exchange completed
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Check if the request failed at the transport level
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// Status code of a completed exchange
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Success { status_code, .. } => Some(*status_code),
            Self::Failure { .. } => None,
        }
    }
}

/// Reduce a failure text to its OS-level description when one is present
///
/// Falls back to the full text when no errno description can be found.
pub fn classify_message(text: &str) -> String {
    if let Some(description) = ERRNO_REGEX.captures(text).and_then(|c| c.get(1)) {
        return description.as_str().to_string();
    }

    if let Some(description) = OS_ERROR_REGEX.captures(text).and_then(|c| c.get(1)) {
        let description = description.as_str().trim();
        if !description.is_empty() {
            return description.to_string();
        }
    }

    text.to_string()
}

/// Render an error with its whole source chain, `outer: inner: root`
pub fn error_chain_text(err: &(dyn StdError + 'static)) -> String {
    let mut parts: Vec<String> = vec![err.to_string()];
    let mut source = err.source();

    while let Some(inner) = source {
        let text = inner.to_string();
        if parts.last() != Some(&text) {
            parts.push(text);
        }
        source = inner.source();
    }

    parts.join(": ")
}
