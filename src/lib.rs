// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unused_async)]

//! # webrecon
//!
//! Reconnaissance scans for web security testing, as a library and a CLI.
//!
//! ## Features
//!
//! - **Method probing**: Issue each HTTP verb against a URL and record status and size
//! - **Asset extraction**: Media, script and link URLs of a page, optionally crawled
//! - **Form extraction**: Forms, their inputs, and inputs outside any form
//! - **Subdomain enumeration**: VirusTotal cursor pagination and crt.sh scraping
//! - **Payload encoding**: `String.fromCharCode(...)` rendering
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use webrecon::http::HttpClient;
//! use webrecon::pagination::PaginatedCollector;
//! use webrecon::subdomains::VirusTotalSource;
//!
//! #[tokio::main]
//! async fn main() -> webrecon::Result<()> {
//!     let client = HttpClient::new()?;
//!     let source = VirusTotalSource::new(&client, "https://www.virustotal.com");
//!
//!     let collection = PaginatedCollector::new(source).collect("example.com").await?;
//!     for name in &collection.results {
//!         println!("{name}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         CLI Runner                              │
//! │  ReconConfig (file + flags) → HttpClient → one scan → output    │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┴───┬──────────────┬──────────────┐
//! │    HTTP      │    Pagination     │    HTML      │  Subdomains  │
//! ├──────────────┼───────────────────┼──────────────┼──────────────┤
//! │ run → Result │ PageCursor        │ Forms        │ VirusTotal   │
//! │ 502 Retry    │ PaginatedCollector│ Assets       │ crt.sh       │
//! │ Rate Limit   │ Merge / Stop      │ Crawl        │              │
//! └──────────────┴───────────────────┴──────────────┴──────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Scan configuration
pub mod config;

/// HTTP client with request capture, retry and rate limiting
pub mod http;

/// Cursor-table pagination
pub mod pagination;

/// HTML form and asset extraction
pub mod html;

/// Subdomain enumeration sources
pub mod subdomains;

/// JavaScript payload encoding
pub mod payload;

/// Text and JSON output
pub mod output;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::ReconConfig;
pub use http::{HttpClient, RequestResult};
pub use pagination::{Collection, PageCursor, PaginatedCollector, StopReason};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
