//! CLI commands and argument parsing

use crate::output::OutputFormat;
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

/// Web reconnaissance toolkit
#[derive(Parser, Debug)]
#[command(name = "webrecon")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Retries for 502 responses on single-shot fetches
    #[arg(long, global = true)]
    pub max_retries: Option<u32>,

    /// Limit requests per second
    #[arg(long, global = true)]
    pub rate: Option<u32>,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe URLs with different HTTP methods (GET, POST, PUT, PATCH, DELETE)
    #[command(group(ArgGroup::new("target").required(true).args(["url", "file"])))]
    Methods {
        /// URL to scan
        #[arg(short, long)]
        url: Option<String>,

        /// File with one URL per line
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Headers, e.g. 'FIRST=HEADER_VALUE;SECOND=HEADER_VALUE'
        #[arg(long, default_value = "")]
        headers: String,

        /// Cookies, e.g. 'FIRST=COOKIE_VALUE;SECOND=COOKIE_VALUE'
        #[arg(long, default_value = "")]
        cookies: String,

        /// Also probe SETTINGS, HEAD, CONNECT, OPTIONS, TRACE
        #[arg(short, long)]
        extra: bool,
    },

    /// Extract media, script and link URLs from a page
    Paths {
        /// URL to scrape
        #[arg(short, long)]
        url: String,

        /// Headers, e.g. 'FIRST=HEADER_VALUE;SECOND=HEADER_VALUE'
        #[arg(long, default_value = "")]
        headers: String,

        /// Cookies, e.g. 'FIRST=COOKIE_VALUE;SECOND=COOKIE_VALUE'
        #[arg(long, default_value = "")]
        cookies: String,

        /// Follow same-host links this many hops (0 = single page)
        #[arg(short, long, default_value = "0")]
        depth: usize,
    },

    /// List forms and inputs of a page (reads HTML from stdin without a URL)
    Forms {
        /// URL to fetch
        url: Option<String>,
    },

    /// Enumerate subdomains through the VirusTotal listing API
    Virustotal {
        /// Domain to enumerate, e.g. example.com
        domain: String,
    },

    /// Enumerate subdomains through crt.sh certificate search
    Crtsh {
        /// Domain to search for, e.g. example.com
        domain: String,
    },

    /// Encode a string as a String.fromCharCode(...) payload
    CharCode {
        /// Text to encode
        string: String,
    },
}
