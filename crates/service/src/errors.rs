use std::time::Duration;

use thiserror::Error;

/// Failures surfaced by repositories and passed through services unchanged.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The store rejected or failed the call; the message is the store's own.
    #[error("{0}")]
    Store(String),
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),
}

impl ServiceError {
    pub fn store(msg: impl Into<String>) -> Self { Self::Store(msg.into()) }
}

impl From<mongodb::error::Error> for ServiceError {
    fn from(e: mongodb::error::Error) -> Self { Self::Store(e.to_string()) }
}
