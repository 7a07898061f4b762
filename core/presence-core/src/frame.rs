//! Presence payloads and the mapping from viewer observations to them.

use chrono::{DateTime, Utc};
use std::path::Path;

use crate::config::IconConfig;

pub const NO_FILE_TEXT: &str = "No file opened";

/// Document format, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Epub,
    Other,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("pdf") => Self::Pdf,
            Some("epub") => Self::Epub,
            _ => Self::Other,
        }
    }

    pub fn icon<'a>(&self, icons: &'a IconConfig) -> &'a str {
        match self {
            Self::Pdf => &icons.pdf,
            Self::Epub => &icons.epub,
            Self::Other => &icons.default,
        }
    }
}

/// The value handed to the presence publisher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceFrame {
    /// First status line: page progress or [`NO_FILE_TEXT`].
    pub primary: String,
    /// Second status line: the file name, empty when nothing is open.
    pub secondary: String,
    pub icon: String,
    pub large_text: String,
    pub started_at: DateTime<Utc>,
}

impl PresenceFrame {
    pub fn reading(
        path: &Path,
        current_page: u32,
        total_pages: u32,
        icons: &IconConfig,
        large_text: String,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            primary: format!("Page: {}/{}", current_page, total_pages),
            secondary: display_name(path),
            icon: DocumentKind::from_path(path).icon(icons).to_string(),
            large_text,
            started_at,
        }
    }

    pub fn idle(icons: &IconConfig, tagline: &str, started_at: DateTime<Utc>) -> Self {
        Self {
            primary: NO_FILE_TEXT.to_string(),
            secondary: String::new(),
            icon: icons.default.clone(),
            large_text: tagline.to_string(),
            started_at,
        }
    }
}

/// File name without its directory, falling back to the full path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

pub fn chapter_text(title: &str) -> String {
    format!("Chapter: {}", title)
}
