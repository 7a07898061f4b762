//! Seams between the loop and the outside world.
//!
//! Production adapters live in the daemon crate; tests substitute scripted
//! fakes.

use std::path::PathBuf;

use crate::error::Result;
use crate::frame::PresenceFrame;

/// Status of the document currently open in the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSnapshot {
    pub path: PathBuf,
    pub current_page: u32,
    pub total_pages: u32,
    /// Raw `documentinfo` JSON, see [`crate::outline`].
    pub document_info: String,
}

/// Finds the viewer process.
pub trait ViewerLocator {
    /// `Ok(None)` when no process with exactly `process_name` is running.
    /// Implementations pick one process deterministically when several match.
    fn locate(&self, process_name: &str) -> Result<Option<u32>>;
}

/// Reads viewer status over the session bus.
pub trait ViewerBus {
    type Connection;

    fn connect(&self) -> Result<Self::Connection>;

    fn is_connected(&self, connection: &Self::Connection) -> bool;

    /// An error is the normal answer when no document is open.
    fn read_status(&self, connection: &Self::Connection, pid: u32) -> Result<DocumentSnapshot>;
}

/// Rich presence session.
pub trait PresencePublisher {
    fn login(&mut self) -> Result<()>;

    fn logout(&mut self) -> Result<()>;

    fn set_state(&mut self, frame: &PresenceFrame) -> Result<()>;
}
