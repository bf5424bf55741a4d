//! Error types for strategy callbacks and the driver loop

use thiserror::Error;

/// Result type returned by every strategy callback and driver entry point.
pub type Result<T> = std::result::Result<T, LearnError>;

/// Errors raised from inside a learning run.
///
/// The driver never produces these itself. They originate in strategy
/// callbacks and propagate unchanged out of [`learn`](crate::learn).
#[derive(Error, Debug)]
pub enum LearnError {
    /// A strategy failed inside one of its callbacks
    #[error("Strategy error: {0}")]
    Strategy(String),

    /// The model reached a state the algorithm cannot continue from
    #[error("Model error: {0}")]
    Model(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other error raised by caller code
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl LearnError {
    /// Create a strategy error with a message
    pub fn strategy(message: impl Into<String>) -> Self {
        Self::Strategy(message.into())
    }

    /// Create a model error with a message
    pub fn model(message: impl Into<String>) -> Self {
        Self::Model(message.into())
    }

    /// Wrap an arbitrary error
    pub fn other(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Other(Box::new(err))
    }
}
