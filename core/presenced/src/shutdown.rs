//! SIGINT/SIGTERM handling.

use std::cell::Cell;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;
use zathura_presence_core::Shutdown;

/// Interruptible sleep fed by a signal handler.
pub struct SignalShutdown {
    receiver: Receiver<()>,
    fired: Cell<bool>,
}

impl SignalShutdown {
    pub fn install() -> Result<Self, ctrlc::Error> {
        let (sender, shutdown) = Self::channel();
        ctrlc::set_handler(move || {
            let _ = sender.send(());
        })?;
        Ok(shutdown)
    }

    fn channel() -> (Sender<()>, Self) {
        let (sender, receiver) = mpsc::channel();
        (
            sender,
            Self {
                receiver,
                fired: Cell::new(false),
            },
        )
    }
}

impl Shutdown for SignalShutdown {
    fn requested(&self) -> bool {
        if !self.fired.get() && self.receiver.try_recv().is_ok() {
            self.fired.set(true);
        }
        self.fired.get()
    }

    fn wait(&self, timeout: Duration) -> bool {
        if self.fired.get() {
            return true;
        }
        match self.receiver.recv_timeout(timeout) {
            Ok(()) => {
                self.fired.set(true);
                true
            }
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => {
                thread::sleep(timeout);
                false
            }
        }
    }
}
