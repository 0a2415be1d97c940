//! Repo Backup Library
//!
//! Scheduled backup runner: clones configured repositories, checksums and
//! archives each one, records a per-run JSON log, and prunes old backup
//! directories past their retention age.

pub mod config;
pub mod runner;
pub mod source;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use utils::errors::BackupError;
pub type Result<T> = std::result::Result<T, BackupError>;
