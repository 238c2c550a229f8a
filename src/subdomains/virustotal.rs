//! VirusTotal subdomain listing
//!
//! The UI API lists subdomains 40 at a time behind a cursor that differs
//! only by one character per page, so pages can be addressed directly
//! through the cursor table instead of following returned cursors.

use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{Page, PageCursor, PageSource};
use crate::types::{DEFAULT_USER_AGENT, USER_AGENTS};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::debug;

/// Items requested per page
pub const PAGE_SIZE: u32 = 40;

#[derive(Debug, Deserialize)]
struct Listing {
    #[serde(default)]
    data: Vec<ListingItem>,
}

#[derive(Debug, Deserialize)]
struct ListingItem {
    id: String,
}

/// Page source backed by the VirusTotal UI API
pub struct VirusTotalSource<'a> {
    client: &'a HttpClient,
    base_url: String,
}

impl<'a> VirusTotalSource<'a> {
    /// Create a source against `base_url` (e.g. `https://www.virustotal.com`)
    pub fn new(client: &'a HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Listing endpoint for a domain
    pub fn listing_url(&self, domain: &str) -> String {
        format!(
            "{}/ui/domains/{}/subdomains",
            self.base_url.trim_end_matches('/'),
            domain
        )
    }
}

#[async_trait]
impl PageSource for VirusTotalSource<'_> {
    async fn fetch_page(&self, domain: &str, cursor: &PageCursor) -> Result<Page> {
        validate_domain(domain)?;

        let config = RequestConfig::new()
            .query("relationships", "resolutions")
            .query("cursor", cursor.token())
            .query("limit", PAGE_SIZE.to_string())
            .header("User-Agent", random_user_agent());

        let response = self.client.get(&self.listing_url(domain), &config).await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        let items = parse_listing(&body, status)?;
        debug!(
            "Page {} for {}: status {}, {} items",
            cursor.index(),
            domain,
            status,
            items.len()
        );
        Ok(Page::new(status, items))
    }
}

/// Extract subdomain ids from a listing body
///
/// An unparsable body on an error status counts as an empty page.
pub fn parse_listing(body: &str, status: u16) -> Result<Vec<String>> {
    match serde_json::from_str::<Listing>(body) {
        Ok(listing) => Ok(listing.data.into_iter().map(|item| item.id).collect()),
        Err(_) if status >= 400 => Ok(Vec::new()),
        Err(e) => Err(Error::decode(format!("unexpected listing body: {e}"))),
    }
}

/// Reject inputs that cannot be a bare domain
pub fn validate_domain(domain: &str) -> Result<()> {
    if domain.is_empty() || domain.contains(['/', '?', '#', ' ']) {
        return Err(Error::usage(format!("invalid domain: '{domain}'")));
    }
    Ok(())
}

fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(DEFAULT_USER_AGENT)
}
