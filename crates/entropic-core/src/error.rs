//! Error types for the notification fabric.

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// The main error type for Entropic core operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Signal-related error.
    #[error("Signal error: {0}")]
    Signal(#[from] SignalError),
}

/// Signal-specific errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SignalError {
    /// The connection ID is invalid or has already been disconnected.
    #[error("Invalid or disconnected connection ID")]
    InvalidConnection,
    /// The model that owned the signal has been dropped.
    #[error("The observed model has been dropped")]
    ModelDropped,
}
