//! Pagination module
//!
//! Cursor-table pagination for listing APIs that encode the page in a
//! fixed token with one varying character.
//!
//! # Overview
//!
//! `PageCursor` derives the token for a page index. `PaginatedCollector`
//! walks a `PageSource` from index 0, deduplicating identifiers, and stops on
//! an empty page, a page with nothing new, or an exhausted cursor table.

mod collector;
mod cursor;

pub use collector::{
    merge_page, Collection, Merge, Page, PageSource, PaginatedCollector, StopReason,
};
pub use cursor::{PageCursor, CURSOR_TABLE, MAX_PAGES};
