//! Report writer
//!
//! Text layouts match what the scans have always printed; JSON mode emits
//! the same data structurally, one compact document per line.

use crate::error::Result;
use crate::html::{FormReport, PageAssets};
use crate::http::RequestResult;
use crate::output::OutputFormat;
use crate::types::{HttpMethod, ResultSet};
use serde::Serialize;
use serde_json::json;
use std::io::Write;

/// Outcome of probing one method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodOutcome {
    pub method: HttpMethod,
    #[serde(flatten)]
    pub result: RequestResult,
}

/// All method outcomes for one URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodScan {
    pub url: String,
    pub results: Vec<MethodOutcome>,
}

impl MethodScan {
    /// Create an empty scan for a URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            results: Vec::new(),
        }
    }

    /// Record one method's outcome
    pub fn push(&mut self, method: HttpMethod, result: RequestResult) {
        self.results.push(MethodOutcome { method, result });
    }
}

/// Writes scan results in the selected format
pub struct ReportWriter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> ReportWriter<W> {
    /// Create a writer
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Consume the writer, returning the underlying sink
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write the result of probing one URL with a set of methods
    pub fn method_scan(&mut self, scan: &MethodScan) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(scan);
        }

        writeln!(self.out)?;
        writeln!(self.out, "{}", scan.url)?;
        for outcome in &scan.results {
            self.method_line(outcome)?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn method_line(&mut self, outcome: &MethodOutcome) -> Result<()> {
        match &outcome.result {
            RequestResult::Success {
                status_code,
                body_size,
            } => writeln!(
                self.out,
                " {:<8} status = {status_code}, size = {body_size} bytes",
                outcome.method
            )?,
            RequestResult::Failure { message } => {
                writeln!(self.out, " {:<8} error = {message}", outcome.method)?;
            }
        }
        Ok(())
    }

    /// Announce the page being scraped (text mode only)
    pub fn scraping(&mut self, url: &str) -> Result<()> {
        if self.format == OutputFormat::Text {
            writeln!(self.out, "[*] Scraping: {url}")?;
            writeln!(self.out, "[*] Extracting urls")?;
            self.out.flush()?;
        }
        Ok(())
    }

    /// Write the media, script and link sections
    pub fn assets(&mut self, url: &str, assets: &PageAssets) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(&json!({
                "url": url,
                "media": assets.media,
                "scripts": assets.scripts,
                "links": assets.links,
            }));
        }

        for (title, values) in [
            ("Media", &assets.media),
            ("Script", &assets.scripts),
            ("Link", &assets.links),
        ] {
            writeln!(self.out)?;
            writeln!(self.out, "[+] {title} urls:")?;
            for value in values {
                writeln!(self.out, "{value}")?;
            }
        }
        Ok(())
    }

    /// Write a form report
    pub fn forms(&mut self, report: &FormReport) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(report);
        }
        writeln!(self.out, "{report}")?;
        Ok(())
    }

    /// Write a set of identifiers, one per line
    pub fn identifiers(&mut self, results: &ResultSet) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(results);
        }
        for item in results {
            writeln!(self.out, "{item}")?;
        }
        Ok(())
    }

    /// Write a single value, such as an encoded payload
    pub fn line(&mut self, value: &str) -> Result<()> {
        if self.format == OutputFormat::Json {
            return self.json(&value);
        }
        writeln!(self.out, "{value}")?;
        Ok(())
    }

    fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer(&mut self.out, value)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
