//! Task representation and panic capture.

use crate::error::Error;
use crate::executor::future::TaskFuture;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Priority level governing pop order. Ties break FIFO by arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Priority {
    Low = 0,
    Normal = 1,
    High = 2,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

type TaskFn = Box<dyn FnOnce() -> std::thread::Result<()> + Send + 'static>;

/// A queued unit of work: closure plus priority.
///
/// The closure performs its own `catch_unwind` at the point of execution
/// and returns the outcome explicitly, so the worker loop never has a
/// panic unwind through it. Result-bearing tasks capture the promise side
/// of a channel; dropping such a task unexecuted drops the sender, which
/// the paired [`TaskFuture`] observes as pool shutdown.
pub(crate) struct Task {
    func: TaskFn,
    priority: Priority,
}

impl Task {
    /// Wrap a fire-and-forget closure. A panic is captured and reported to
    /// the caller of [`Task::run`]; nobody else observes it.
    pub fn fire_and_forget<F>(f: F, priority: Priority) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Task {
            func: Box::new(move || catch_unwind(AssertUnwindSafe(f)).map(|_| ())),
            priority,
        }
    }

    /// Wrap a result-bearing closure, returning the task and the future
    /// that resolves to the closure's return value or its captured panic.
    pub fn with_result<T, F>(f: F, priority: Priority) -> (Self, TaskFuture<T>)
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let func: TaskFn = Box::new(move || match catch_unwind(AssertUnwindSafe(f)) {
            Ok(value) => {
                let _ = tx.send(Ok(value));
                Ok(())
            }
            Err(payload) => {
                let _ = tx.send(Err(Error::TaskPanicked(panic_message(&payload))));
                Err(payload)
            }
        });
        (Task { func, priority }, TaskFuture::new(rx))
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Execute the closure; a panic comes back as `Err(payload)`, already
    /// published to the task's future if it has one.
    pub fn run(self) -> std::thread::Result<()> {
        (self.func)()
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("priority", &self.priority)
            .finish()
    }
}

/// Best-effort extraction of a panic payload's message.
pub(crate) fn panic_message(payload: &Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
