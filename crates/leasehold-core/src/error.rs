//! Error types for Leasehold

use thiserror::Error;

/// Result type alias using Leasehold's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Leasehold error types
///
/// Expected contention (losing a creation race, acquiring a lock held by
/// another owner, releasing a lock you don't hold) is never an error; those
/// outcomes surface as ordinary return values from the lock manager. The
/// variants here are hard failures that no retry policy at this layer can
/// resolve.
#[derive(Error, Debug)]
pub enum Error {
    // Database errors (E100-E199)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to decode lock record: {0}")]
    Parse(String),

    // Config errors (E200-E299)
    #[error("Configuration error: {0}")]
    Config(String),

    // Input errors (E300-E399)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::Database(_) => "E100",
            Self::Parse(_) => "E101",
            Self::Config(_) => "E200",
            Self::InvalidInput(_) => "E300",
            Self::Io(_) => "E9999",
        }
    }
}
