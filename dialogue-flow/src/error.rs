use thiserror::Error;

/// Errors raised while running a dialogue graph.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("session state error: {0}")]
    StateError(String),
}

pub type Result<T> = std::result::Result<T, FlowError>;
