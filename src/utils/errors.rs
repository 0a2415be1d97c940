//! Custom error types for the backup runner.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("Invalid repository name: {0}")]
    InvalidName(String),

    #[error("Clone failed: {0}")]
    Clone(String),

    #[error("Checksum failed: {0}")]
    Checksum(String),

    #[error("Archive creation failed: {0}")]
    Archive(String),

    #[error("Archive verification failed: {0}")]
    Verify(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BackupError>;
