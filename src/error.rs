//! Error types for flowstep
//!
//! Defines the core error taxonomy used throughout the kernel. Platform or
//! application code built on top of flowstep can wrap these with its own
//! error types via `#[from]`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowstepError {
    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("index {index} out of range (size {size})")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("incompatible buffers: {0}")]
    Incompatible(String),

    #[error("step() called with no scheduled work")]
    NoScheduledWork,

    #[error("post() called after executor shut down")]
    PoolShutDown,

    #[error("functor error: {0}")]
    Functor(#[from] anyhow::Error),
}

/// Result type that uses `FlowstepError`.
pub type Result<T> = std::result::Result<T, FlowstepError>;
