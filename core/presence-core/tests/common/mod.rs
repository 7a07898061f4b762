//! Scripted collaborators for loop scenarios.

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing_subscriber::fmt::MakeWriter;
use zathura_presence_core::{
    DocumentSnapshot, PresenceError, PresenceFrame, PresencePublisher, Result, Shutdown,
    ViewerBus, ViewerLocator,
};

pub fn at(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .expect("parse")
        .with_timezone(&Utc)
}

pub fn snapshot(path: &str, current_page: u32, total_pages: u32) -> DocumentSnapshot {
    DocumentSnapshot {
        path: PathBuf::from(path),
        current_page,
        total_pages,
        document_info: String::new(),
    }
}

pub type LocatorAnswer = std::result::Result<Option<u32>, String>;

/// Answers from a queue; repeats the last answer once the queue drains.
#[derive(Clone)]
pub struct FakeLocator {
    answers: Arc<Mutex<VecDeque<LocatorAnswer>>>,
    last: Arc<Mutex<LocatorAnswer>>,
    pub lookups: Arc<Mutex<usize>>,
}

impl FakeLocator {
    pub fn new(answers: Vec<Option<u32>>) -> Self {
        Self::scripted(answers.into_iter().map(Ok).collect())
    }

    /// `Err` answers surface as process-table failures.
    pub fn scripted(answers: Vec<LocatorAnswer>) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.into())),
            last: Arc::new(Mutex::new(Ok(None))),
            lookups: Arc::new(Mutex::new(0)),
        }
    }

    pub fn lookups(&self) -> usize {
        *self.lookups.lock().expect("lock lookups")
    }
}

impl ViewerLocator for FakeLocator {
    fn locate(&self, process_name: &str) -> Result<Option<u32>> {
        assert_eq!(process_name, "zathura");
        *self.lookups.lock().expect("lock lookups") += 1;
        let mut last = self.last.lock().expect("lock last");
        if let Some(answer) = self.answers.lock().expect("lock answers").pop_front() {
            *last = answer;
        }
        last.clone().map_err(|details| PresenceError::Io {
            context: "Failed to read process table".to_string(),
            source: std::io::Error::other(details),
        })
    }
}

pub struct FakeConnection {
    pub alive: Arc<Mutex<bool>>,
}

#[derive(Clone)]
pub struct FakeBus {
    connect_failures: Arc<Mutex<usize>>,
    pub connects: Arc<Mutex<usize>>,
    pub alive: Arc<Mutex<bool>>,
    statuses: Arc<Mutex<VecDeque<Option<DocumentSnapshot>>>>,
    last: Arc<Mutex<Option<DocumentSnapshot>>>,
}

impl FakeBus {
    pub fn new(statuses: Vec<Option<DocumentSnapshot>>) -> Self {
        Self {
            connect_failures: Arc::new(Mutex::new(0)),
            connects: Arc::new(Mutex::new(0)),
            alive: Arc::new(Mutex::new(true)),
            statuses: Arc::new(Mutex::new(statuses.into())),
            last: Arc::new(Mutex::new(None)),
        }
    }

    pub fn failing_first(self, failures: usize) -> Self {
        *self.connect_failures.lock().expect("lock failures") = failures;
        self
    }

    pub fn connects(&self) -> usize {
        *self.connects.lock().expect("lock connects")
    }

    pub fn drop_connection(&self) {
        *self.alive.lock().expect("lock alive") = false;
    }
}

impl ViewerBus for FakeBus {
    type Connection = FakeConnection;

    fn connect(&self) -> Result<FakeConnection> {
        let mut failures = self.connect_failures.lock().expect("lock failures");
        if *failures > 0 {
            *failures -= 1;
            return Err(PresenceError::BusConnect("no session bus".to_string()));
        }
        *self.connects.lock().expect("lock connects") += 1;
        *self.alive.lock().expect("lock alive") = true;
        Ok(FakeConnection {
            alive: Arc::clone(&self.alive),
        })
    }

    fn is_connected(&self, connection: &FakeConnection) -> bool {
        *connection.alive.lock().expect("lock alive")
    }

    fn read_status(&self, _connection: &FakeConnection, _pid: u32) -> Result<DocumentSnapshot> {
        let mut last = self.last.lock().expect("lock last");
        if let Some(status) = self.statuses.lock().expect("lock statuses").pop_front() {
            *last = status;
        }
        last.clone().ok_or_else(|| PresenceError::BusQuery {
            property: "filename".to_string(),
            details: "no document open".to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublisherCall {
    Login,
    Logout,
    SetState(PresenceFrame),
}

#[derive(Clone, Default)]
pub struct FakePublisher {
    pub calls: Arc<Mutex<Vec<PublisherCall>>>,
    login_failures: Arc<Mutex<usize>>,
    publish_failures: Arc<Mutex<usize>>,
}

impl FakePublisher {
    pub fn failing_logins(self, failures: usize) -> Self {
        *self.login_failures.lock().expect("lock failures") = failures;
        self
    }

    pub fn failing_publishes(self, failures: usize) -> Self {
        *self.publish_failures.lock().expect("lock failures") = failures;
        self
    }

    pub fn calls(&self) -> Vec<PublisherCall> {
        self.calls.lock().expect("lock calls").clone()
    }

    pub fn frames(&self) -> Vec<PresenceFrame> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PublisherCall::SetState(frame) => Some(frame),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &PublisherCall) -> usize {
        self.calls().iter().filter(|call| *call == wanted).count()
    }

    fn take_failure(counter: &Mutex<usize>) -> bool {
        let mut remaining = counter.lock().expect("lock failures");
        if *remaining > 0 {
            *remaining -= 1;
            return true;
        }
        false
    }
}

impl PresencePublisher for FakePublisher {
    fn login(&mut self) -> Result<()> {
        self.calls.lock().expect("lock calls").push(PublisherCall::Login);
        if Self::take_failure(&self.login_failures) {
            return Err(PresenceError::Login("discord not running".to_string()));
        }
        Ok(())
    }

    fn logout(&mut self) -> Result<()> {
        self.calls.lock().expect("lock calls").push(PublisherCall::Logout);
        Ok(())
    }

    fn set_state(&mut self, frame: &PresenceFrame) -> Result<()> {
        self.calls
            .lock()
            .expect("lock calls")
            .push(PublisherCall::SetState(frame.clone()));
        if Self::take_failure(&self.publish_failures) {
            return Err(PresenceError::Publish("pipe closed".to_string()));
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().expect("lock buffer").clone()).expect("utf8")
    }
}

impl std::io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("lock buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for SharedBuffer {
    type Writer = SharedBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Runs `f` with a debug-level subscriber and returns what it logged.
pub fn capture_logs(f: impl FnOnce()) -> String {
    let buffer = SharedBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .without_time()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(buffer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    buffer.contents()
}

/// Allows a fixed number of ticks and records every requested pause.
pub struct TickBudget {
    remaining: Cell<usize>,
    pub pauses: std::cell::RefCell<Vec<Duration>>,
}

impl TickBudget {
    pub fn new(ticks: usize) -> Self {
        Self {
            remaining: Cell::new(ticks),
            pauses: std::cell::RefCell::new(Vec::new()),
        }
    }
}

impl Shutdown for TickBudget {
    fn requested(&self) -> bool {
        self.remaining.get() == 0
    }

    fn wait(&self, timeout: Duration) -> bool {
        self.pauses.borrow_mut().push(timeout);
        self.remaining.set(self.remaining.get().saturating_sub(1));
        self.remaining.get() == 0
    }
}
