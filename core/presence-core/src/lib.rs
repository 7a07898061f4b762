//! # zathura-presence-core
//!
//! Mirrors what is open in the zathura document viewer into Discord rich
//! presence.
//!
//! ## Design Principles
//!
//! - **Synchronous**: one thread, one tick at a time. No async runtime.
//! - **Level-triggered**: each tick rebuilds the full presence frame from live
//!   observations; only the reading-session start and last file carry over.
//! - **Never fatal**: external failures degrade a tick, they never end the loop.
//! - **Pluggable edges**: the process table, the session bus and the presence
//!   service sit behind the traits in [`viewer`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use zathura_presence_core::{PollState, PresenceConfig, Reconciler};
//!
//! let mut reconciler = Reconciler::new(PresenceConfig::default(), locator, bus, publisher);
//! let mut state = PollState::default();
//! reconciler.run(&mut state, &shutdown);
//! ```

pub mod config;
pub mod error;
pub mod frame;
pub mod outline;
pub mod reconcile;
pub mod session;
pub mod viewer;

pub use config::{load_config, IconConfig, PresenceConfig};
pub use error::{PresenceError, Result};
pub use frame::{DocumentKind, PresenceFrame};
pub use outline::{DocumentInfo, OutlineEntry};
pub use reconcile::{PollState, Reconciler, Shutdown, TickOutcome};
pub use session::ReadingSession;
pub use viewer::{DocumentSnapshot, PresencePublisher, ViewerBus, ViewerLocator};
