use thiserror::Error;

#[derive(Error, Debug)]
pub enum AttendanceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Access denied: {0}")]
    Authorization(String),

    /// Business-rule rejection; the message states the allowed window or reason.
    #[error("{0}")]
    Rejected(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type AttendanceResult<T> = Result<T, AttendanceError>;
