//! CLI module
//!
//! Command-line interface for running scans.
//!
//! # Commands
//!
//! - `methods` - Probe URLs with different HTTP methods
//! - `paths` - Extract media, script and link URLs from a page
//! - `forms` - List forms and inputs of a page
//! - `virustotal` - Enumerate subdomains through VirusTotal
//! - `crtsh` - Enumerate subdomains through crt.sh
//! - `char-code` - Encode a `String.fromCharCode` payload

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
