//! Thread-safe priority-ordered holding area for pending tasks.
//!
//! A single `BinaryHeap` under one mutex serves all producers and workers.
//! Ordering is priority first, then arrival sequence, so equal-priority
//! tasks pop in FIFO order. Blocking pops wait on a condition variable with
//! a predicate re-check loop.

use crate::executor::{Priority, Task};
use parking_lot::{Condvar, Mutex};
use std::cmp::Ordering as CmpOrdering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

/// Heap entry: a task tagged with its priority and arrival sequence.
struct QueuedTask {
    task: Task,
    priority: Priority,
    seq: u64,
}

impl PartialEq for QueuedTask {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for QueuedTask {}

impl PartialOrd for QueuedTask {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedTask {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        // Max-heap: higher priority wins, then lower sequence (earlier arrival).
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

struct Inner {
    heap: BinaryHeap<QueuedTask>,
    next_seq: u64,
    closed: bool,
}

/// Mutex+condvar protected priority queue shared by producers and workers.
pub(crate) struct PriorityTaskQueue {
    inner: Mutex<Inner>,
    not_empty: Condvar,
}

impl PriorityTaskQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                heap: BinaryHeap::new(),
                next_seq: 0,
                closed: false,
            }),
            not_empty: Condvar::new(),
        }
    }

    /// Insert a task and wake one waiting consumer.
    ///
    /// Returns the task back if the queue has been closed, so the caller
    /// can account for the rejection.
    pub fn push(&self, task: Task) -> Result<(), Task> {
        {
            let mut inner = self.inner.lock();
            if inner.closed {
                return Err(task);
            }
            let seq = inner.next_seq;
            inner.next_seq += 1;
            let priority = task.priority();
            inner.heap.push(QueuedTask {
                task,
                priority,
                seq,
            });
        }
        self.not_empty.notify_one();
        Ok(())
    }

    /// Insert a batch under a single lock acquisition, preserving the
    /// batch's relative order for equal-priority tie-breaking. Wakes all
    /// waiting consumers. Returns the whole batch back if closed.
    pub fn push_batch(&self, tasks: Vec<Task>) -> Result<usize, Vec<Task>> {
        if tasks.is_empty() {
            return Ok(0);
        }
        let count = tasks.len();
        {
            let mut inner = self.inner.lock();
            if inner.closed {
                return Err(tasks);
            }
            for task in tasks {
                let seq = inner.next_seq;
                inner.next_seq += 1;
                let priority = task.priority();
                inner.heap.push(QueuedTask {
                    task,
                    priority,
                    seq,
                });
            }
        }
        self.not_empty.notify_all();
        Ok(count)
    }

    /// Block until a task is available, or until the queue is closed and
    /// drained, which returns `None` as the consumer-exit signal.
    pub fn pop(&self) -> Option<Task> {
        let mut inner = self.inner.lock();
        loop {
            if let Some(entry) = inner.heap.pop() {
                return Some(entry.task);
            }
            if inner.closed {
                return None;
            }
            self.not_empty.wait(&mut inner);
        }
    }

    /// Non-blocking pop.
    pub fn try_pop(&self) -> Option<Task> {
        self.inner.lock().heap.pop().map(|entry| entry.task)
    }

    /// Block up to `timeout` for a task; `None` on expiry or on
    /// closed-and-drained.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<Task> {
        let deadline = Instant::now() + timeout;
        let mut inner = self.inner.lock();
        loop {
            if let Some(entry) = inner.heap.pop() {
                return Some(entry.task);
            }
            if inner.closed {
                return None;
            }
            if self.not_empty.wait_until(&mut inner, deadline).timed_out() {
                return inner.heap.pop().map(|entry| entry.task);
            }
        }
    }

    /// Drain up to `max` highest-priority tasks in one critical section.
    pub fn try_pop_batch(&self, max: usize) -> Vec<Task> {
        let mut inner = self.inner.lock();
        let take = max.min(inner.heap.len());
        let mut batch = Vec::with_capacity(take);
        for _ in 0..take {
            match inner.heap.pop() {
                Some(entry) => batch.push(entry.task),
                None => break,
            }
        }
        batch
    }

    /// Atomically drain everything and wake all blocked poppers. The
    /// drained tasks are returned so the pool can account for them.
    pub fn clear(&self) -> Vec<Task> {
        let drained: Vec<Task> = {
            let mut inner = self.inner.lock();
            inner.heap.drain().map(|entry| entry.task).collect()
        };
        self.not_empty.notify_all();
        drained
    }

    /// Mark the queue closed and wake all blocked poppers. Pushes fail from
    /// here on; pops keep draining whatever is left, then return `None`.
    pub fn close(&self) {
        self.inner.lock().closed = true;
        self.not_empty.notify_all();
    }

    /// Snapshot length; may be stale by the time the caller acts on it.
    pub fn len(&self) -> usize {
        self.inner.lock().heap.len()
    }

    /// Snapshot emptiness; advisory only.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().heap.is_empty()
    }
}
