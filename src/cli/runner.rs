//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::{parse_pairs, ReconConfig};
use crate::error::{Error, Result, ResultExt};
use crate::html::{crawl_assets, extract_forms};
use crate::http::{HttpClient, RateLimiterConfig, RequestConfig};
use crate::output::{MethodScan, ReportWriter};
use crate::pagination::PaginatedCollector;
use crate::payload::from_char_code;
use crate::subdomains::{CrtShSource, VirusTotalSource};
use crate::types::{HttpMethod, StringMap};
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command, writing results to stdout
    pub async fn run(&self) -> Result<()> {
        self.run_with_output(io::stdout()).await
    }

    /// Run the CLI command, writing results to `out`
    pub async fn run_with_output<W: Write>(&self, out: W) -> Result<()> {
        let config = self.load_config()?;
        let mut writer = ReportWriter::new(out, self.cli.format);

        match &self.cli.command {
            Commands::Methods {
                url,
                file,
                headers,
                cookies,
                extra,
            } => {
                let urls = match (url, file) {
                    (Some(url), _) => vec![url.clone()],
                    (None, Some(path)) => read_url_list(path)?,
                    (None, None) => return Err(Error::usage("either --url or --file is required")),
                };
                self.methods(&config, &urls, headers, cookies, *extra, &mut writer)
                    .await
            }
            Commands::Paths {
                url,
                headers,
                cookies,
                depth,
            } => {
                self.paths(&config, url, headers, cookies, *depth, &mut writer)
                    .await
            }
            Commands::Forms { url } => self.forms(&config, url.as_deref(), &mut writer).await,
            Commands::Virustotal { domain } => {
                self.virustotal(&config, domain, &mut writer).await
            }
            Commands::Crtsh { domain } => self.crtsh(&config, domain, &mut writer).await,
            Commands::CharCode { string } => writer.line(&from_char_code(string)?),
        }
    }

    /// Build the effective configuration: file (or defaults) plus CLI overrides
    fn load_config(&self) -> Result<ReconConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ReconConfig::load(path)?,
            None => ReconConfig::default(),
        };

        if let Some(timeout) = self.cli.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(retries) = self.cli.max_retries {
            config.retry.max_retries = retries;
        }
        if let Some(rate) = self.cli.rate {
            config.rate_limit = Some(RateLimiterConfig::per_second(rate));
        }

        config.validate()?;
        Ok(config)
    }

    /// Build the HTTP client for a scan
    fn client(config: &ReconConfig) -> Result<HttpClient> {
        HttpClient::with_config(config.http_client_config()).context("failed to build HTTP client")
    }

    /// Probe every URL with the selected methods
    async fn methods<W: Write>(
        &self,
        config: &ReconConfig,
        urls: &[String],
        raw_headers: &str,
        raw_cookies: &str,
        extra: bool,
        writer: &mut ReportWriter<W>,
    ) -> Result<()> {
        let (headers, cookies) = scan_headers_and_cookies(config, raw_headers, raw_cookies)?;
        let client = Self::client(config)?;
        let methods = HttpMethod::probe_set(extra);

        info!("Probing {} urls with {} methods", urls.len(), methods.len());

        for url in urls {
            let mut scan = MethodScan::new(url.as_str());
            for method in &methods {
                let result = client.run(url, *method, &headers, &cookies).await;
                debug!("{} {}: {:?}", method, url, result);
                scan.push(*method, result);
            }
            writer.method_scan(&scan)?;
        }

        Ok(())
    }

    /// Extract media, script and link URLs from a page
    async fn paths<W: Write>(
        &self,
        config: &ReconConfig,
        url: &str,
        raw_headers: &str,
        raw_cookies: &str,
        depth: usize,
        writer: &mut ReportWriter<W>,
    ) -> Result<()> {
        let (headers, cookies) = scan_headers_and_cookies(config, raw_headers, raw_cookies)?;
        let client = Self::client(config)?;
        let request = RequestConfig::with_headers_and_cookies(&headers, &cookies);

        writer.scraping(url)?;
        let assets = crawl_assets(&client, url, &request, depth).await?;
        writer.assets(url, &assets)
    }

    /// List forms of a fetched page, or of HTML piped on stdin
    async fn forms<W: Write>(
        &self,
        config: &ReconConfig,
        url: Option<&str>,
        writer: &mut ReportWriter<W>,
    ) -> Result<()> {
        let html = match url {
            Some(url) => {
                let client = Self::client(config)?;
                let request =
                    RequestConfig::with_headers_and_cookies(&config.request_headers(), &config.cookies);
                let response = client.get(url, &request).await?;

                let status = response.status().as_u16();
                if status != 200 {
                    return Err(Error::unexpected_status(status));
                }
                response.text().await?
            }
            None if !io::stdin().is_terminal() => {
                let mut html = String::new();
                io::stdin()
                    .read_to_string(&mut html)
                    .context("failed to read HTML from stdin")?;
                html
            }
            None => {
                return Err(Error::usage(
                    "usage: webrecon forms <url>  (or pipe HTML on stdin)",
                ))
            }
        };

        writer.forms(&extract_forms(&html))
    }

    /// Enumerate subdomains through the VirusTotal listing API
    async fn virustotal<W: Write>(
        &self,
        config: &ReconConfig,
        domain: &str,
        writer: &mut ReportWriter<W>,
    ) -> Result<()> {
        let client = Self::client(config)?;
        let collector =
            PaginatedCollector::new(VirusTotalSource::new(&client, &config.endpoints.virustotal));

        let collection = collector.collect(domain).await?;
        info!(
            "Collected {} subdomains of {} over {} pages ({:?})",
            collection.results.len(),
            domain,
            collection.pages_fetched,
            collection.stop
        );
        writer.identifiers(&collection.results)
    }

    /// Enumerate subdomains through crt.sh
    async fn crtsh<W: Write>(
        &self,
        config: &ReconConfig,
        domain: &str,
        writer: &mut ReportWriter<W>,
    ) -> Result<()> {
        let client = Self::client(config)?;
        let names = CrtShSource::new(&client, &config.endpoints.crtsh)
            .fetch(domain)
            .await?;
        writer.identifiers(&names)
    }
}

/// Read a URL list: one URL per line, trimmed, blank lines skipped
fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read URL list {}", path.display()))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// Merge CLI `KEY=VALUE` pairs over the configured headers and cookies
fn scan_headers_and_cookies(
    config: &ReconConfig,
    raw_headers: &str,
    raw_cookies: &str,
) -> Result<(StringMap, StringMap)> {
    let mut merged = config.clone();
    merged.headers.extend(parse_pairs(raw_headers)?);
    merged.cookies.extend(parse_pairs(raw_cookies)?);
    Ok((merged.request_headers(), merged.cookies))
}
