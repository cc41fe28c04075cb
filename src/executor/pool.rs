//! The thread pool: worker lifecycle and the submission API.

use super::future::TaskFuture;
use super::task::{Priority, Task};
use super::worker::Worker;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::metrics::{PoolMetrics, PoolStats};
use crate::queue::PriorityTaskQueue;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

// Pool lifecycle states; transitions Running -> ShuttingDown -> Stopped
// exactly once, never reversed.
const RUNNING: u8 = 0;
const SHUTTING_DOWN: u8 = 1;
const STOPPED: u8 = 2;

/// State shared between the pool handle and its workers.
pub(crate) struct PoolShared {
    pub(crate) queue: PriorityTaskQueue,
    pub(crate) metrics: PoolMetrics,
    state: AtomicU8,
    /// Tasks accepted but not yet finished: queued plus executing. Counted
    /// from the moment a submission is accepted until the task finishes or
    /// shutdown drops it, so `wait_for_all` never has a window where a task
    /// is in flight but invisible.
    in_flight: AtomicUsize,
    done_lock: Mutex<()>,
    all_done: Condvar,
}

impl PoolShared {
    fn new() -> Self {
        Self {
            queue: PriorityTaskQueue::new(),
            metrics: PoolMetrics::new(),
            state: AtomicU8::new(RUNNING),
            in_flight: AtomicUsize::new(0),
            done_lock: Mutex::new(()),
            all_done: Condvar::new(),
        }
    }

    fn is_running(&self) -> bool {
        self.state.load(Ordering::Acquire) == RUNNING
    }

    /// Mark `count` accepted tasks finished (executed or dropped), waking
    /// `wait_for_all` callers when nothing remains in flight.
    pub(crate) fn finish_tasks(&self, count: usize) {
        if self.in_flight.fetch_sub(count, Ordering::AcqRel) == count {
            // Taking the lock before notifying closes the race against a
            // waiter that has checked the counter but not yet gone to sleep.
            let _guard = self.done_lock.lock();
            self.all_done.notify_all();
        }
    }

    fn wait_for_all(&self) {
        let mut guard = self.done_lock.lock();
        while self.in_flight.load(Ordering::Acquire) != 0 {
            self.all_done.wait(&mut guard);
        }
    }
}

/// A fixed-size pool of worker threads draining one shared priority queue.
///
/// Tasks are submitted with [`ThreadPool::post`] (fire-and-forget) or
/// [`ThreadPool::submit`] (result-bearing); each takes a `_with_priority`
/// variant. The pool is an explicitly owned object: construct it, pass it
/// around, and [`ThreadPool::shutdown`] it (or let `Drop` do so).
pub struct ThreadPool {
    shared: Arc<PoolShared>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    num_threads: usize,
}

impl ThreadPool {
    /// Spawn `config.worker_threads()` workers. Fails fast on an invalid
    /// config or a thread-spawn error. Does not block on worker readiness;
    /// the first thing a worker does is attempt to pop.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let num_threads = config.worker_threads();

        let shared = Arc::new(PoolShared::new());
        let mut workers = Vec::with_capacity(num_threads);

        for id in 0..num_threads {
            let shared = Arc::clone(&shared);
            let name = format!("{}-{}", config.thread_name_prefix, id);

            let mut builder = thread::Builder::new().name(name);
            if let Some(stack_size) = config.stack_size {
                builder = builder.stack_size(stack_size);
            }

            let handle = builder
                .spawn(move || Worker::new(id).run(shared))
                .map_err(|e| Error::executor(format!("spawn failed: {}", e)))?;
            workers.push(handle);
        }

        debug!(num_threads, "thread pool started");

        Ok(Self {
            shared,
            workers: Mutex::new(workers),
            num_threads,
        })
    }

    /// Pool with `n` workers and otherwise default configuration.
    pub fn with_threads(n: usize) -> Result<Self> {
        let config = Config::builder().num_threads(n).build()?;
        Self::new(&config)
    }

    /// Fire-and-forget submission at [`Priority::Normal`].
    pub fn post<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.post_with_priority(f, Priority::Normal)
    }

    /// Fire-and-forget submission. Completion and failure are observable
    /// only through [`ThreadPool::wait_for_all`] and [`ThreadPool::stats`].
    pub fn post_with_priority<F>(&self, f: F, priority: Priority) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.push_task(Task::fire_and_forget(f, priority))
    }

    /// Result-bearing submission at [`Priority::Normal`].
    pub fn submit<T, F>(&self, f: F) -> Result<TaskFuture<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        self.submit_with_priority(f, Priority::Normal)
    }

    /// Result-bearing submission. The returned future resolves to the
    /// closure's value, its captured panic, or [`Error::PoolShutDown`] if
    /// shutdown drops the task before it runs.
    pub fn submit_with_priority<T, F>(&self, f: F, priority: Priority) -> Result<TaskFuture<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (task, future) = Task::with_result(f, priority);
        self.push_task(task)?;
        Ok(future)
    }

    /// Submit a batch of fire-and-forget closures under a single queue lock
    /// acquisition. Relative order within the batch is preserved for
    /// equal-priority tie-breaking. Returns the number of tasks accepted.
    pub fn post_batch<I, F>(&self, closures: I, priority: Priority) -> Result<usize>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() + Send + 'static,
    {
        let tasks: Vec<Task> = closures
            .into_iter()
            .map(|f| Task::fire_and_forget(f, priority))
            .collect();
        let count = tasks.len();
        if count == 0 {
            return Ok(0);
        }

        if !self.shared.is_running() {
            return Err(self.reject(count));
        }

        self.shared.in_flight.fetch_add(count, Ordering::AcqRel);
        match self.shared.queue.push_batch(tasks) {
            Ok(accepted) => Ok(accepted),
            Err(returned) => {
                // Lost the race against shutdown; the queue closed under us.
                self.shared.finish_tasks(returned.len());
                Err(self.reject(returned.len()))
            }
        }
    }

    /// Block until the queue is drained and no task is executing.
    ///
    /// Tasks posted from other threads after this call begins may or may
    /// not be waited for ("all" is a snapshot notion), but every task that
    /// existed at call time is covered.
    pub fn wait_for_all(&self) {
        self.shared.wait_for_all();
    }

    /// Stop the pool: close the queue, drop pending tasks (their futures
    /// resolve to [`Error::PoolShutDown`]), join every worker. Idempotent;
    /// a second call returns immediately. `Drop` calls it if the caller
    /// never did.
    pub fn shutdown(&self) {
        if self
            .shared
            .state
            .compare_exchange(RUNNING, SHUTTING_DOWN, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        debug!("thread pool shutting down");

        // Close first so no push can land after the drain.
        self.shared.queue.close();
        let dropped = self.shared.queue.clear();
        if !dropped.is_empty() {
            debug!(dropped = dropped.len(), "dropped pending tasks");
            let count = dropped.len();
            // Dropping the tasks drops their promise senders; futures
            // observe the disconnect as PoolShutDown.
            drop(dropped);
            self.shared.finish_tasks(count);
        }

        let handles: Vec<JoinHandle<()>> = std::mem::take(&mut *self.workers.lock());
        for handle in handles {
            let _ = handle.join();
        }

        self.shared.state.store(STOPPED, Ordering::Release);
        debug!("thread pool stopped");
    }

    /// Number of worker threads; unchanged by shutdown.
    pub fn thread_count(&self) -> usize {
        self.num_threads
    }

    /// Snapshot of the pool's task counters.
    pub fn stats(&self) -> PoolStats {
        self.shared.metrics.snapshot()
    }

    /// Tasks currently queued (not yet popped). Advisory snapshot.
    pub fn pending_tasks(&self) -> usize {
        self.shared.queue.len()
    }

    fn push_task(&self, task: Task) -> Result<()> {
        if !self.shared.is_running() {
            return Err(self.reject(1));
        }

        // Count the task in flight before it becomes poppable, so a worker
        // finishing it can never decrement below the submission's increment.
        self.shared.in_flight.fetch_add(1, Ordering::AcqRel);
        match self.shared.queue.push(task) {
            Ok(()) => Ok(()),
            Err(_task) => {
                self.shared.finish_tasks(1);
                Err(self.reject(1))
            }
        }
    }

    fn reject(&self, count: usize) -> Error {
        for _ in 0..count {
            self.shared.metrics.record_rejected();
        }
        warn!(count, "submission rejected: pool is not running");
        Error::PoolStopped
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPool")
            .field("num_threads", &self.num_threads)
            .field("pending_tasks", &self.pending_tasks())
            .finish()
    }
}
