//! Error types for Fruitcut
//!
//! Session operations themselves never fail: collisions, stale cut targets and
//! full or empty collections are reported as values. The errors here cover the
//! surrounding machinery (configuration, channels, task lifecycle).

use thiserror::Error;

/// Top-level error for the core and runtime crates
#[derive(Debug, Error)]
pub enum FruitcutError {
    /// Invalid configuration value
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    /// Event channel communication error
    #[error("Channel error: {message}")]
    Channel { message: String },

    /// The session has already been shut down
    #[error("Session is shut down")]
    Shutdown,

    /// A spawned task panicked or was aborted
    #[error("Task join error: {message}")]
    TaskJoin { message: String },
}

impl FruitcutError {
    /// Create a configuration error with a reason
    pub fn config_error<T: Into<String>>(reason: T) -> Self {
        FruitcutError::Configuration {
            reason: reason.into(),
        }
    }

    /// Create a channel error with a message
    pub fn channel_error<T: Into<String>>(message: T) -> Self {
        FruitcutError::Channel {
            message: message.into(),
        }
    }
}

impl From<tokio::task::JoinError> for FruitcutError {
    fn from(err: tokio::task::JoinError) -> Self {
        FruitcutError::TaskJoin {
            message: err.to_string(),
        }
    }
}

/// Result alias used across the workspace
pub type FruitcutResult<T> = Result<T, FruitcutError>;
