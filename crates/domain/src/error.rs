use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("server rejected request (status {status}): {message}")]
    Upstream { status: u16, message: String },
    #[error("invalid response payload: {0}")]
    InvalidResponse(String),
    #[error("not found")]
    NotFound,
    #[error("data integrity violation: {0}")]
    Integrity(String),
    #[error("push channel unavailable: {0}")]
    ChannelUnavailable(String),
}
