//! priopool - a priority-aware thread pool
//!
//! A fixed set of worker threads draining one shared priority queue, with
//! future-based result retrieval, batch submission, bulk-completion
//! synchronization, and graceful shutdown.
//!
//! # Quick Start
//!
//! ```no_run
//! use priopool::prelude::*;
//!
//! let pool = ThreadPool::new(&Config::default()).unwrap();
//!
//! // Fire-and-forget
//! pool.post(|| println!("hello from a worker")).unwrap();
//!
//! // Result-bearing, with priority
//! let future = pool
//!     .submit_with_priority(|| 2 + 2, Priority::High)
//!     .unwrap();
//! assert_eq!(future.get().unwrap(), 4);
//!
//! pool.wait_for_all();
//! pool.shutdown();
//! ```
//!
//! # Guarantees
//!
//! - **Ordering**: a strictly higher-priority task is never popped after a
//!   lower-priority one that is still waiting; equal priorities run FIFO.
//! - **Isolation**: a panicking task never takes down its worker or the
//!   pool; the panic surfaces through the task's future (if any) and the
//!   `tasks_failed` counter.
//! - **Shutdown**: idempotent, race-free against concurrent submission;
//!   futures of dropped tasks resolve to an error instead of hanging.

// Lint configuration
#![warn(missing_docs, missing_debug_implementations)]
#![allow(dead_code)]

pub mod config;
pub mod error;
pub mod executor;
pub mod metrics;
pub mod prelude;

pub(crate) mod queue;

// Re-export key types at crate root
pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use executor::{Priority, TaskFuture, ThreadPool};
pub use metrics::PoolStats;
