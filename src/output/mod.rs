//! Output module
//!
//! Renders scan results to stdout either as the human-readable text
//! reports or as JSON (one document per line).
//!
//! # Overview
//!
//! - `OutputFormat` - selected with `--format`
//! - `ReportWriter` - writes method scans, asset listings, form reports,
//!   identifier sets and single payload lines to any `io::Write`

mod writer;

pub use writer::{MethodOutcome, MethodScan, ReportWriter};

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text reports
    #[default]
    Text,
    /// JSON output (one document per line)
    Json,
}
