//! Configuration management for the backup runner.
//!
//! Loads configuration from a TOML file; individual fields can be
//! overridden on the command line.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub backup: BackupConfig,
    pub git: GitConfig,
    #[serde(default)]
    pub retention: RetentionConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Root directory that holds one timestamped subdirectory per run
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Repository names to back up, processed in this order
    #[serde(default)]
    pub repositories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    /// Base URL; clone URLs are formed as `<remote>/<name>.git`
    pub remote: String,

    /// Shallow clone depth (full history when unset)
    #[serde(default)]
    pub depth: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Maximum age in days before a backup directory is deleted
    #[serde(default = "default_retention_days")]
    pub days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default values
fn default_output_dir() -> PathBuf {
    PathBuf::from("backups")
}

fn default_retention_days() -> i64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            days: default_retention_days(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backup: BackupConfig {
                output_dir: default_output_dir(),
                repositories: Vec::new(),
            },
            git: GitConfig {
                remote: "https://github.com".to_string(),
                depth: None,
            },
            retention: RetentionConfig::default(),
            log: LogConfig::default(),
        }
    }
}
