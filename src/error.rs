pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("executor error: {0}")]
    Executor(String),

    #[error("pool is stopped and no longer accepts tasks")]
    PoolStopped,

    #[error("task dropped before execution: pool shut down")]
    PoolShutDown,

    #[error("task panicked: {0}")]
    TaskPanicked(String),

    #[error("timed out waiting for task result")]
    Timeout,
}

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    pub fn executor<S: Into<String>>(msg: S) -> Self {
        Error::Executor(msg.into())
    }
}
