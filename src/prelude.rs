//! Convenience re-exports of the crate's public surface.

pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{Error, Result};
pub use crate::executor::{Priority, TaskFuture, ThreadPool};
pub use crate::metrics::PoolStats;
