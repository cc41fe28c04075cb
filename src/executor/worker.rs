// worker thread loop

use super::pool::PoolShared;
use super::task::panic_message;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

pub(crate) type WorkerId = usize;

pub(crate) struct Worker {
    pub id: WorkerId,
}

impl Worker {
    pub fn new(id: WorkerId) -> Self {
        Self { id }
    }

    /// Pop-execute-record loop. `pop` returning `None` means the queue is
    /// closed and drained; the thread exits.
    pub fn run(&self, shared: Arc<PoolShared>) {
        debug!(worker = self.id, "worker started");

        while let Some(task) = shared.queue.pop() {
            let start = Instant::now();
            let outcome = task.run();
            let elapsed = start.elapsed();

            match outcome {
                Ok(()) => shared.metrics.record_completed(elapsed),
                Err(payload) => {
                    warn!(
                        worker = self.id,
                        panic = %panic_message(&payload),
                        "task panicked"
                    );
                    shared.metrics.record_failed(elapsed);
                }
            }

            shared.finish_tasks(1);
        }

        debug!(worker = self.id, "worker exiting");
    }
}
