//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Failed to start an engine timing thread
    #[error("Timing thread spawn failed: {0}")]
    TimingThread(String),

    /// A required host capability is not available
    #[error("Capability not available: {0}")]
    Unavailable(String),

    /// Generic platform error
    #[error("Platform error: {0}")]
    Other(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
