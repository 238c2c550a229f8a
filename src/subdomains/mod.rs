//! Subdomain enumeration module
//!
//! Two third-party sources, both usable without an API key:
//! - `VirusTotalSource` - cursor-paginated JSON listing, driven by the
//!   `PaginatedCollector`
//! - `CrtShSource` - single HTML page from the certificate transparency search

mod crtsh;
mod virustotal;

pub use crtsh::{parse_results_page, CrtShSource};
pub use virustotal::{parse_listing, validate_domain, VirusTotalSource, PAGE_SIZE};
