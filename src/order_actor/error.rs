use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Order validation error: {0}")]
    ValidationError(String),
    #[error("Order rejected: {0}")]
    Rejected(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for OrderError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            FrameworkError::Rejected(reason) => OrderError::Rejected(reason),
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}
