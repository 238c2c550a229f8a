//! HTML scans
//!
//! Parsing is delegated to `scraper`; these functions only query tags and
//! attributes.
//!
//! - `extract_forms` - forms, their inputs, and standalone inputs
//! - `extract_assets` / `crawl_assets` - media, script and link URLs

mod assets;
mod forms;

pub use assets::{crawl_assets, extract_assets, PageAssets};
pub use forms::{extract_forms, FormInfo, FormReport, InputInfo};
