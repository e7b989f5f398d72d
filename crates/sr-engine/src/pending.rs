//! Handle to a path search running on the rayon pool.

use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::time::Duration;

use sr_search::Path;

use crate::{NavError, NavResult};

/// The result of a background request.  The worker sends exactly one
/// message; if it dies first, waiting yields [`NavError::WorkerLost`].
#[derive(Debug)]
pub struct PendingPath {
    rx: Receiver<NavResult<Path>>,
}

impl PendingPath {
    pub(crate) fn new(rx: Receiver<NavResult<Path>>) -> Self {
        Self { rx }
    }

    /// Block until the search finishes.
    pub fn wait(self) -> NavResult<Path> {
        self.rx.recv().map_err(|_| NavError::WorkerLost)?
    }

    /// Block for at most `timeout`.  `None` while the search is still
    /// running; the handle stays usable.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<NavResult<Path>> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(NavError::WorkerLost)),
        }
    }

    /// Non-blocking poll.
    pub fn try_get(&self) -> Option<NavResult<Path>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(NavError::WorkerLost)),
        }
    }
}
