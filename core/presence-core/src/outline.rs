//! Document outline parsing and chapter lookup.
//!
//! zathura exposes its table of contents as a JSON string through the
//! `documentinfo` bus property:
//!
//! ```json
//! {
//!   "filename": "/home/me/book.pdf",
//!   "numberofpages": 320,
//!   "index": [
//!     { "title": "Preface", "page": 1, "subindex": null },
//!     { "title": "Basics", "page": 10, "subindex": [ ... ] }
//!   ]
//! }
//! ```
//!
//! `index` and `subindex` are nullable. An absent index (`None`) is different
//! from an index with no entries (`Some(vec![])`); both resolve to
//! [`PresenceError::ChapterNotFound`] or [`PresenceError::MissingIndex`] so the
//! caller can log them differently.

use serde::Deserialize;

use crate::error::{PresenceError, Result};

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DocumentInfo {
    #[serde(default)]
    pub filename: String,
    #[serde(default, rename = "numberofpages")]
    pub number_of_pages: u32,
    #[serde(default)]
    pub index: Option<Vec<OutlineEntry>>,
}

/// One node of the table of contents.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct OutlineEntry {
    pub title: String,
    pub page: u32,
    #[serde(default, rename = "subindex")]
    pub children: Option<Vec<OutlineEntry>>,
}

impl DocumentInfo {
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Title of the chapter active at `page`.
    pub fn chapter_at(&self, page: u32) -> Result<&str> {
        let Some(entries) = self.index.as_deref() else {
            return Err(PresenceError::MissingIndex {
                filename: self.filename.clone(),
            });
        };
        resolve_chapter(entries, page)
    }
}

/// Finds the top-level entry with the greatest page that is still on or before
/// `page`. Entries are scanned in the given order with a running maximum, so a
/// later entry sharing the current best page replaces the earlier one.
///
/// Child entries are not searched.
pub fn resolve_chapter(entries: &[OutlineEntry], page: u32) -> Result<&str> {
    let mut best: Option<&OutlineEntry> = None;
    for entry in entries {
        if entry.page > page {
            continue;
        }
        if best.map_or(true, |current| entry.page >= current.page) {
            best = Some(entry);
        }
    }

    best.map(|entry| entry.title.as_str())
        .ok_or(PresenceError::ChapterNotFound { page })
}

/// Parses the raw `documentinfo` blob and resolves the chapter at `page`.
pub fn chapter_for_page(raw: &str, page: u32) -> Result<String> {
    let info = DocumentInfo::parse(raw)?;
    info.chapter_at(page).map(str::to_string)
}
