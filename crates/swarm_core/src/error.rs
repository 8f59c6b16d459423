//! # Core Error Types
//!
//! All errors that can occur while building storage, executors or configs.
//! System passes themselves never fail.

use thiserror::Error;

use crate::systems::SimdBackend;

/// Errors that can occur in the core engine.
#[derive(Error, Debug)]
pub enum SwarmError {
    /// Aligned memory for a column could not be obtained.
    #[error("allocation of {bytes} bytes aligned to {align} failed")]
    Allocation {
        /// Requested size in bytes.
        bytes: usize,
        /// Requested alignment in bytes.
        align: usize,
    },

    /// The requested array size does not fit in the address space.
    #[error("capacity overflow: {len} elements of {elem_size} bytes")]
    CapacityOverflow {
        /// Requested element count.
        len: usize,
        /// Size of one element in bytes.
        elem_size: usize,
    },

    /// A tunable is outside its accepted range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The requested kernel backend is not available on this CPU.
    #[error("kernel backend {0} is not supported on this CPU")]
    UnsupportedBackend(SimdBackend),

    /// The worker pool could not be started.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),

    /// A configuration file could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations.
pub type SwarmResult<T> = Result<T, SwarmError>;
