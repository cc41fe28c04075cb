//! Future side of the task result channel.

use crate::error::{Error, Result};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::time::Duration;

/// Read handle for a submitted task's result.
///
/// The worker fulfills the paired promise exactly once, with either the
/// closure's return value or its captured panic. If the pool shuts down
/// before the task runs, the promise is dropped and `get` resolves to
/// [`Error::PoolShutDown`] instead of hanging.
pub struct TaskFuture<T> {
    rx: Receiver<Result<T>>,
}

impl<T> TaskFuture<T> {
    pub(crate) fn new(rx: Receiver<Result<T>>) -> Self {
        Self { rx }
    }

    /// Block until the task finishes; returns its value, its captured
    /// panic as [`Error::TaskPanicked`], or [`Error::PoolShutDown`].
    pub fn get(self) -> Result<T> {
        match self.rx.recv() {
            Ok(outcome) => outcome,
            Err(_) => Err(Error::PoolShutDown),
        }
    }

    /// Like [`TaskFuture::get`], but gives up after `timeout` with
    /// [`Error::Timeout`].
    pub fn get_timeout(self, timeout: Duration) -> Result<T> {
        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => outcome,
            Err(RecvTimeoutError::Timeout) => Err(Error::Timeout),
            Err(RecvTimeoutError::Disconnected) => Err(Error::PoolShutDown),
        }
    }
}

impl<T> std::fmt::Debug for TaskFuture<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskFuture")
            .field("ready", &!self.rx.is_empty())
            .finish()
    }
}
