//! Cursor table for the listing API
//!
//! The upstream cursor is a fixed token with one varying character; page
//! `i` uses the `i`-th character of the table below.

use std::fmt;

/// Cursor character for each page index
pub const CURSOR_TABLE: &str = "AEIMQUYcgkosw";

/// Number of pages addressable through the table
pub const MAX_PAGES: usize = CURSOR_TABLE.len();

/// Opaque pagination token for one page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageCursor {
    index: usize,
    id_char: char,
}

impl PageCursor {
    /// Cursor for a 0-based page index, `None` once the table is exhausted
    pub fn for_index(index: usize) -> Option<Self> {
        CURSOR_TABLE
            .as_bytes()
            .get(index)
            .map(|&b| Self {
                index,
                id_char: char::from(b),
            })
    }

    /// Page index this cursor addresses
    pub fn index(&self) -> usize {
        self.index
    }

    /// Table character for this page
    pub fn id_char(&self) -> char {
        self.id_char
    }

    /// Token as sent in the `cursor` query parameter (before URL encoding)
    pub fn token(&self) -> String {
        format!("ST{}wCi4=", self.id_char)
    }
}

impl fmt::Display for PageCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}
