//! Task execution infrastructure.
//!
//! This module provides the worker threads, the task wrapper with its
//! panic boundary, the future side of result channels, and the thread
//! pool itself.

pub mod future;
pub mod pool;
pub(crate) mod task;
pub(crate) mod worker;

pub use future::TaskFuture;
pub use pool::ThreadPool;
pub use task::Priority;

pub(crate) use task::Task;
