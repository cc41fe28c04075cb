//! Lock-free pool counters.
//!
//! Workers update these atomics after every task; readers take a
//! [`PoolStats`] snapshot at any time without touching the queue lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Atomic counters updated by workers on the hot path.
#[derive(Debug)]
pub(crate) struct PoolMetrics {
    tasks_completed: AtomicU64,
    tasks_failed: AtomicU64,
    tasks_rejected: AtomicU64,
    total_task_time_ns: AtomicU64,
}

impl PoolMetrics {
    pub fn new() -> Self {
        Self {
            tasks_completed: AtomicU64::new(0),
            tasks_failed: AtomicU64::new(0),
            tasks_rejected: AtomicU64::new(0),
            total_task_time_ns: AtomicU64::new(0),
        }
    }

    pub fn record_completed(&self, elapsed: Duration) {
        self.tasks_completed.fetch_add(1, Ordering::Relaxed);
        self.total_task_time_ns
            .fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn record_failed(&self, elapsed: Duration) {
        self.tasks_failed.fetch_add(1, Ordering::Relaxed);
        self.total_task_time_ns
            .fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.tasks_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> PoolStats {
        PoolStats {
            tasks_completed: self.tasks_completed.load(Ordering::Relaxed),
            tasks_failed: self.tasks_failed.load(Ordering::Relaxed),
            tasks_rejected: self.tasks_rejected.load(Ordering::Relaxed),
            total_task_time: Duration::from_nanos(self.total_task_time_ns.load(Ordering::Relaxed)),
        }
    }
}

/// Read-only snapshot of the pool's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Tasks that ran to completion.
    pub tasks_completed: u64,
    /// Tasks whose closure panicked.
    pub tasks_failed: u64,
    /// Submissions refused because the pool was not running.
    pub tasks_rejected: u64,
    /// Cumulative wall-clock execution time across completed and failed tasks.
    pub total_task_time: Duration,
}
