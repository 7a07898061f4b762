//! Error types for the presence core and its collaborators.

use std::path::PathBuf;

/// All errors that can occur while observing the viewer or publishing presence.
///
/// Adapters convert their transport errors (bus, IPC, process table) into the
/// matching variant with a rendered message so the loop never depends on a
/// particular client library.
#[derive(Debug, thiserror::Error)]
pub enum PresenceError {
    // ─────────────────────────────────────────────────────────────────────
    // Viewer Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Session bus connection failed: {0}")]
    BusConnect(String),

    #[error("Viewer property query failed: {property}: {details}")]
    BusQuery { property: String, details: String },

    // ─────────────────────────────────────────────────────────────────────
    // Presence Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Presence login failed: {0}")]
    Login(String),

    #[error("Presence logout failed: {0}")]
    Logout(String),

    #[error("Presence update failed: {0}")]
    Publish(String),

    #[error("Presence session is not connected")]
    NotConnected,

    // ─────────────────────────────────────────────────────────────────────
    // Outline Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Document info is not valid JSON: {0}")]
    MalformedOutline(#[from] serde_json::Error),

    #[error("No index found on document: {filename}")]
    MissingIndex { filename: String },

    #[error("No chapter starts on or before page {page}")]
    ChapterNotFound { page: u32 },

    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Configuration file malformed: {path}: {details}")]
    ConfigMalformed { path: PathBuf, details: String },

    #[error("Configuration directory not found")]
    ConfigDirNotFound,

    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results using PresenceError.
pub type Result<T> = std::result::Result<T, PresenceError>;
