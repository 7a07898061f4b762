//! The polling loop that keeps rich presence in line with the viewer.
//!
//! Every tick re-derives the full presence state from fresh observations:
//!
//! ```text
//! bus check ──► locate viewer ──► ensure login ──► read status ──► publish
//!     │               │                 │
//!     └─ retry later  └─ logout         └─ retry next tick
//! ```
//!
//! All cross-tick state lives in [`PollState`], which the caller owns and lends
//! to [`Reconciler::tick`] by `&mut`. Nothing here fails the loop; external
//! failures are logged and the tick is skipped or degraded.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::PresenceConfig;
use crate::error::PresenceError;
use crate::frame::{chapter_text, PresenceFrame};
use crate::outline::chapter_for_page;
use crate::session::ReadingSession;
use crate::viewer::{DocumentSnapshot, PresencePublisher, ViewerBus, ViewerLocator};

/// Mutable loop state. Lives for the whole process.
#[derive(Debug)]
pub struct PollState<C> {
    /// True while the publisher is logged in.
    pub presence_connected: bool,
    pub bus: Option<C>,
    pub session: ReadingSession,
    /// Consecutive failed logins since the last successful one.
    pub login_failures: u32,
}

impl<C> Default for PollState<C> {
    fn default() -> Self {
        Self {
            presence_connected: false,
            bus: None,
            session: ReadingSession::default(),
            login_failures: 0,
        }
    }
}

/// How a tick ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No usable bus connection; the next tick waits for the bus retry delay.
    BusUnavailable,
    ViewerAbsent,
    LoginFailed,
    Published { document_open: bool },
    PublishFailed { document_open: bool },
}

impl TickOutcome {
    /// Delay before the next tick.
    pub fn pause(&self, config: &PresenceConfig) -> Duration {
        match self {
            Self::BusUnavailable => config.bus_retry(),
            _ => config.tick_interval(),
        }
    }
}

/// Cooperative stop signal for [`Reconciler::run`].
pub trait Shutdown {
    fn requested(&self) -> bool;

    /// Sleeps up to `timeout`; returns true as soon as shutdown is requested.
    fn wait(&self, timeout: Duration) -> bool;
}

pub struct Reconciler<L, B, P> {
    config: PresenceConfig,
    locator: L,
    bus: B,
    publisher: P,
}

impl<L, B, P> Reconciler<L, B, P>
where
    L: ViewerLocator,
    B: ViewerBus,
    P: PresencePublisher,
{
    pub fn new(config: PresenceConfig, locator: L, bus: B, publisher: P) -> Self {
        Self {
            config,
            locator,
            bus,
            publisher,
        }
    }

    /// Ticks until `shutdown` fires, then logs out.
    pub fn run<S: Shutdown>(&mut self, state: &mut PollState<B::Connection>, shutdown: &S) {
        info!(
            process_name = %self.config.process_name,
            show_chapters = self.config.show_chapters,
            "Presence loop started"
        );

        while !shutdown.requested() {
            let outcome = self.tick(state, Utc::now());
            debug!(outcome = ?outcome, "Tick finished");
            if shutdown.wait(outcome.pause(&self.config)) {
                break;
            }
        }

        self.disconnect_presence(state);
        info!("Presence loop stopped");
    }

    pub fn tick(&mut self, state: &mut PollState<B::Connection>, now: DateTime<Utc>) -> TickOutcome {
        if !self.ensure_bus(state) {
            return TickOutcome::BusUnavailable;
        }

        let pid = match self.locator.locate(&self.config.process_name) {
            Ok(Some(pid)) => pid,
            Ok(None) => {
                self.disconnect_presence(state);
                return TickOutcome::ViewerAbsent;
            }
            Err(err) => {
                debug!(error = %err, "Viewer lookup failed");
                self.disconnect_presence(state);
                return TickOutcome::ViewerAbsent;
            }
        };

        if !state.presence_connected {
            if let Err(err) = self.publisher.login() {
                if state.login_failures == 0 {
                    error!(error = %err, "Failed to log in to presence service");
                } else {
                    debug!(
                        error = %err,
                        attempts = state.login_failures + 1,
                        "Presence login still failing"
                    );
                }
                state.login_failures = state.login_failures.saturating_add(1);
                return TickOutcome::LoginFailed;
            }
            info!(pid, "Presence session started");
            state.presence_connected = true;
            state.login_failures = 0;
        }

        let Some(connection) = state.bus.as_ref() else {
            return TickOutcome::BusUnavailable;
        };
        let status = self.bus.read_status(connection, pid);

        let (frame, document_open) = match status {
            Ok(snapshot) => (self.reading_frame(&mut state.session, &snapshot, now), true),
            Err(err) => {
                debug!(error = %err, "No document open");
                let started_at = state.session.observe(None, now);
                (
                    PresenceFrame::idle(&self.config.icons, &self.config.tagline, started_at),
                    false,
                )
            }
        };

        match self.publisher.set_state(&frame) {
            Ok(()) => TickOutcome::Published { document_open },
            Err(err) => {
                error!(error = %err, primary = %frame.primary, "Failed to publish presence");
                // The session is presumed broken; log in again next tick.
                self.disconnect_presence(state);
                TickOutcome::PublishFailed { document_open }
            }
        }
    }

    fn ensure_bus(&self, state: &mut PollState<B::Connection>) -> bool {
        if let Some(connection) = state.bus.as_ref() {
            if self.bus.is_connected(connection) {
                return true;
            }
            warn!("Session bus connection lost; reconnecting");
            state.bus = None;
        }

        match self.bus.connect() {
            Ok(connection) => {
                info!("Connected to session bus");
                state.bus = Some(connection);
                true
            }
            Err(err) => {
                error!(
                    error = %err,
                    retry_secs = self.config.bus_retry_secs,
                    "Failed to connect to session bus"
                );
                false
            }
        }
    }

    fn disconnect_presence(&mut self, state: &mut PollState<B::Connection>) {
        if !state.presence_connected {
            return;
        }
        if let Err(err) = self.publisher.logout() {
            warn!(error = %err, "Presence logout failed");
        }
        state.presence_connected = false;
        info!("Presence session ended");
    }

    fn reading_frame(
        &self,
        session: &mut ReadingSession,
        snapshot: &DocumentSnapshot,
        now: DateTime<Utc>,
    ) -> PresenceFrame {
        let started_at = session.observe(Some(&snapshot.path), now);
        PresenceFrame::reading(
            &snapshot.path,
            snapshot.current_page,
            snapshot.total_pages,
            &self.config.icons,
            self.large_text(snapshot),
            started_at,
        )
    }

    fn large_text(&self, snapshot: &DocumentSnapshot) -> String {
        if !self.config.show_chapters {
            return self.config.tagline.clone();
        }

        match chapter_for_page(&snapshot.document_info, snapshot.current_page) {
            Ok(title) => chapter_text(&title),
            Err(err @ PresenceError::MalformedOutline(_)) => {
                warn!(
                    error = %err,
                    path = %snapshot.path.display(),
                    "Could not read document outline"
                );
                self.config.tagline.clone()
            }
            Err(err @ PresenceError::MissingIndex { .. }) => {
                debug!(error = %err, "Document has no outline");
                self.config.tagline.clone()
            }
            Err(_) => self.config.tagline.clone(),
        }
    }
}
