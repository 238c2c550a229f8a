//! Asset and link extraction
//!
//! Collects media, script and link URLs from a page and can follow
//! same-host links to a bounded depth.

use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::types::ResultSet;
use scraper::{Html, Selector};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use std::sync::LazyLock;
use tracing::{debug, info, warn};
use url::Url;

type Sources = Vec<(Selector, &'static str)>;

fn sources(pairs: &[(&str, &'static str)]) -> Sources {
    pairs
        .iter()
        .map(|(tag, attr)| (Selector::parse(tag).unwrap(), *attr))
        .collect()
}

static MEDIA_SOURCES: LazyLock<Sources> =
    LazyLock::new(|| sources(&[("img", "src"), ("video", "src"), ("link", "href")]));
static SCRIPT_SOURCES: LazyLock<Sources> = LazyLock::new(|| sources(&[("script", "src")]));
static LINK_SOURCES: LazyLock<Sources> =
    LazyLock::new(|| sources(&[("a", "href"), ("form", "action")]));

/// URLs referenced by a page, grouped by kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageAssets {
    pub media: ResultSet,
    pub scripts: ResultSet,
    pub links: ResultSet,
}

impl PageAssets {
    /// Merge another page's assets into this one
    pub fn merge(&mut self, other: PageAssets) {
        self.media.extend(other.media);
        self.scripts.extend(other.scripts);
        self.links.extend(other.links);
    }

    /// Rewrite every value as an absolute URL relative to `base`
    ///
    /// Values that cannot be joined are kept as written.
    pub fn resolved_against(&self, base: &Url) -> PageAssets {
        let resolve = |set: &ResultSet| -> ResultSet {
            set.iter()
                .map(|value| {
                    base.join(value)
                        .map_or_else(|_| value.clone(), |url| url.to_string())
                })
                .collect()
        };

        PageAssets {
            media: resolve(&self.media),
            scripts: resolve(&self.scripts),
            links: resolve(&self.links),
        }
    }

    /// Total number of distinct values across groups
    pub fn len(&self) -> usize {
        self.media.len() + self.scripts.len() + self.links.len()
    }

    /// Check if nothing was found
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Extract media, script and link URLs from an HTML document
///
/// Values are returned exactly as written in the markup; empty ones are
/// skipped.
pub fn extract_assets(html: &str) -> PageAssets {
    let document = Html::parse_document(html);

    PageAssets {
        media: attr_values(&document, &MEDIA_SOURCES),
        scripts: attr_values(&document, &SCRIPT_SOURCES),
        links: attr_values(&document, &LINK_SOURCES),
    }
}

fn attr_values(document: &Html, sources: &Sources) -> ResultSet {
    sources
        .iter()
        .flat_map(|(selector, attr)| {
            document
                .select(selector)
                .filter_map(|element| element.value().attr(attr))
        })
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Fetch `start` and extract its assets, following same-host links up to
/// `depth` hops
///
/// With `depth == 0` only the start page is fetched and values are kept as
/// written. When following links, values are resolved to absolute URLs so
/// results from different pages are comparable. Failures on followed pages
/// are logged and skipped; a failure on the start page is returned.
pub async fn crawl_assets(
    client: &HttpClient,
    start: &str,
    request: &RequestConfig,
    depth: usize,
) -> Result<PageAssets> {
    let start_url = Url::parse(start)?;

    let html = client.get(start_url.as_str(), request).await?.text().await?;
    let first = extract_assets(&html);
    if depth == 0 {
        return Ok(first);
    }

    let mut assets = first.resolved_against(&start_url);
    let mut visited = HashSet::from([page_key(&start_url)]);
    let mut queue = VecDeque::new();
    enqueue_links(&assets.links, &start_url, 1, &mut visited, &mut queue);

    while let Some((url, level)) = queue.pop_front() {
        debug!("Following {} (depth {})", url, level);

        let html = match fetch_html(client, &url, request).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Skipping {}: {}", url, e);
                continue;
            }
        };

        let page = extract_assets(&html).resolved_against(&url);
        if level < depth {
            enqueue_links(&page.links, &start_url, level + 1, &mut visited, &mut queue);
        }
        assets.merge(page);
    }

    info!("Crawled {} pages, {} distinct urls", visited.len(), assets.len());
    Ok(assets)
}

async fn fetch_html(client: &HttpClient, url: &Url, request: &RequestConfig) -> Result<String> {
    Ok(client.get(url.as_str(), request).await?.text().await?)
}

fn enqueue_links(
    links: &ResultSet,
    origin: &Url,
    level: usize,
    visited: &mut HashSet<String>,
    queue: &mut VecDeque<(Url, usize)>,
) {
    for link in links {
        let Ok(url) = Url::parse(link) else {
            continue;
        };
        if !matches!(url.scheme(), "http" | "https") || url.host_str() != origin.host_str() {
            continue;
        }
        if visited.insert(page_key(&url)) {
            queue.push_back((url, level));
        }
    }
}

fn page_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.to_string()
}
