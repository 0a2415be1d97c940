//! Repo Backup - Main entry point
//!
//! Clones each configured repository, archives and checksums it, writes a
//! JSON run log, then prunes backup directories past their retention age.

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use repo_backup::runner::retention::cleanup_old_backups;
use repo_backup::runner::run_log::RunStatus;
use repo_backup::runner::{BackupRunner, RunContext};
use repo_backup::source::GitSource;
use repo_backup::{utils, Config};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Backup output root (overrides config)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Retention age in days (overrides config)
    #[arg(short, long)]
    retention_days: Option<i64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Skip the retention cleanup pass
    #[arg(long)]
    skip_cleanup: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = if let Some(config_path) = args.config {
        Config::from_file(&config_path)?
    } else {
        Config::default()
    };

    // Initialize logging
    let log_level = args.log_level.as_deref().unwrap_or(&config.log.level);
    utils::logger::init(log_level)?;

    tracing::info!("Starting repo-backup v{}", env!("CARGO_PKG_VERSION"));

    let output_root = args.output_dir.unwrap_or(config.backup.output_dir);
    let retention_days = args.retention_days.unwrap_or(config.retention.days);
    anyhow::ensure!(retention_days > 0, "retention days must be positive");

    let ctx = RunContext::new(
        config.backup.repositories,
        output_root.clone(),
        retention_days,
    );
    let source = GitSource::new(config.git.remote, config.git.depth);

    let log = BackupRunner::new(ctx, source).run_all().await?;

    if !args.skip_cleanup {
        let removed = cleanup_old_backups(&output_root, retention_days, Utc::now())?;
        tracing::info!("Retention cleanup removed {} backup directories", removed);
    }

    // Scheduler contract: non-zero exit only when every repository failed
    if log.status == RunStatus::Failed {
        anyhow::bail!("all {} repositories failed to back up", log.summary.total);
    }

    Ok(())
}
