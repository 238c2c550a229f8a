//! crt.sh certificate search scraping
//!
//! The HTML result page holds the certificate table in the second
//! `td.outer` cell; the fifth column lists matching names separated by `<br>`.

use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::types::ResultSet;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::{info, warn};

static OUTER_CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td.outer").unwrap());
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());

/// Column holding the matching identities
const NAME_COLUMN: usize = 4;

/// Subdomain source backed by crt.sh
pub struct CrtShSource<'a> {
    client: &'a HttpClient,
    base_url: String,
}

impl<'a> CrtShSource<'a> {
    /// Create a source against `base_url` (e.g. `https://crt.sh`)
    pub fn new(client: &'a HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Search certificates for `domain` and collect the listed names
    ///
    /// Transient 502s are retried by the client; any other non-200 status
    /// is an `UnexpectedStatus` error.
    pub async fn fetch(&self, domain: &str) -> Result<ResultSet> {
        super::validate_domain(domain)?;

        let url = format!("{}/", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get_with_retry(&url, &RequestConfig::new().query("q", domain))
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(Error::unexpected_status(status));
        }

        let body = response.text().await?;
        let names = parse_results_page(&body);
        info!("crt.sh listed {} names for {}", names.len(), domain);
        Ok(names)
    }
}

/// Extract the names from a crt.sh result page
pub fn parse_results_page(html: &str) -> ResultSet {
    let document = Html::parse_document(html);
    let mut names = ResultSet::new();

    let Some(table) = document.select(&OUTER_CELL).nth(1) else {
        warn!("crt.sh page has no result table");
        return names;
    };

    for row in table.select(&ROW).skip(1) {
        let Some(cell) = row.select(&CELL).nth(NAME_COLUMN) else {
            continue;
        };

        names.extend(
            cell.text()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(ToString::to_string),
        );
    }

    names
}
