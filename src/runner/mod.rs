//! Backup runner - Orchestrates the per-repository backup pipeline.
//!
//! For each configured repository, in order: clone to a scratch directory,
//! checksum the clone, pack it into a `.tar.gz`, verify the archive, record
//! the outcome. One repository's failure never aborts the others; the run
//! ends by finalizing and persisting the run log.

pub mod archive;
pub mod checksum;
pub mod retention;
pub mod run_log;

use crate::source::RepoSource;
use crate::utils::errors::{BackupError, Result};
use anyhow::Context;
use chrono::{DateTime, Utc};
use retention::RUN_TS_FORMAT;
use run_log::{BackupEntry, EntryStatus, RunLog};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Everything a run needs, threaded explicitly — no ambient state.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Repository names, processed in this order
    pub repositories: Vec<String>,
    /// Root directory holding one timestamped subdirectory per run
    pub output_root: PathBuf,
    pub retention_days: i64,
    pub started_at: DateTime<Utc>,
    /// `YYYYMMDD_HHMMSS` UTC, shared by every artifact of this run
    pub run_ts: String,
}

impl RunContext {
    pub fn new(repositories: Vec<String>, output_root: PathBuf, retention_days: i64) -> Self {
        Self::starting_at(repositories, output_root, retention_days, Utc::now())
    }

    pub fn starting_at(
        repositories: Vec<String>,
        output_root: PathBuf,
        retention_days: i64,
        started_at: DateTime<Utc>,
    ) -> Self {
        let run_ts = started_at.format(RUN_TS_FORMAT).to_string();
        Self {
            repositories,
            output_root,
            retention_days,
            started_at,
            run_ts,
        }
    }

    /// Directory receiving this run's archives and log
    pub fn run_dir(&self) -> PathBuf {
        self.output_root.join(&self.run_ts)
    }

    /// Scratch root for clones; removed at the end of the run.
    /// `.work` never parses as a run timestamp, so retention skips it.
    pub fn work_root(&self) -> PathBuf {
        self.output_root.join(".work").join(&self.run_ts)
    }

    pub fn archive_path(&self, name: &str) -> PathBuf {
        self.run_dir().join(format!("{}_{}.tar.gz", name, self.run_ts))
    }

    pub fn log_path(&self) -> PathBuf {
        self.run_dir().join(format!("backup_log_{}.json", self.run_ts))
    }
}

/// Main backup runner
pub struct BackupRunner<S: RepoSource> {
    ctx: RunContext,
    source: S,
}

impl<S: RepoSource> BackupRunner<S> {
    pub fn new(ctx: RunContext, source: S) -> Self {
        Self { ctx, source }
    }

    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    /// Back up every configured repository sequentially and persist the log.
    ///
    /// Only environmental failures (run directory uncreatable, log
    /// unwritable) return `Err`; per-repository failures become failed
    /// entries in the returned log.
    pub async fn run_all(&self) -> anyhow::Result<RunLog> {
        let run_dir = self.ctx.run_dir();
        std::fs::create_dir_all(&run_dir)
            .with_context(|| format!("failed to create run directory {}", run_dir.display()))?;

        info!(
            "Starting backup of {} repositories (run {})",
            self.ctx.repositories.len(),
            self.ctx.run_ts
        );

        let mut log = RunLog::new(self.ctx.started_at);

        for name in &self.ctx.repositories {
            info!("Backing up {}", name);
            let entry = self.backup_repository(name).await;
            match entry.status {
                EntryStatus::Success => {
                    info!("  {} done ({} bytes)", name, entry.size_bytes.unwrap_or(0));
                }
                EntryStatus::Failed => {
                    warn!(
                        "  {} failed: {}",
                        name,
                        entry.error.as_deref().unwrap_or("unknown error")
                    );
                }
            }
            log.push(entry);
        }

        log.finalize();

        // Scratch removal is best-effort; a leftover never ages into the log
        let _ = std::fs::remove_dir_all(self.ctx.work_root());

        let log_path = self.ctx.log_path();
        log.save(&log_path)
            .with_context(|| format!("failed to write run log {}", log_path.display()))?;

        info!(
            "Run {}: {:?} ({} total, {} success, {} failed)",
            self.ctx.run_ts, log.status, log.summary.total, log.summary.success, log.summary.failed
        );

        Ok(log)
    }

    /// Back up a single repository; all failures are folded into the entry.
    pub async fn backup_repository(&self, name: &str) -> BackupEntry {
        match self.try_backup(name).await {
            Ok(entry) => entry,
            Err(e) => BackupEntry::failed(name, &self.ctx.run_ts, e.to_string()),
        }
    }

    async fn try_backup(&self, name: &str) -> Result<BackupEntry> {
        validate_name(name)?;

        let work = self.ctx.work_root().join(name);
        if work.exists() {
            std::fs::remove_dir_all(&work)?;
        }
        std::fs::create_dir_all(self.ctx.work_root())?;

        let result = self.run_pipeline(name, &work).await;

        // The scratch clone goes away in both outcomes
        let _ = std::fs::remove_dir_all(&work);

        result
    }

    /// Clone, checksum, archive, verify — in that order, first failure wins.
    async fn run_pipeline(&self, name: &str, work: &Path) -> Result<BackupEntry> {
        self.source.fetch(name, work).await?;

        let clone_dir = work.to_path_buf();
        let checksum = tokio::task::spawn_blocking(move || checksum::hash_directory(&clone_dir))
            .await
            .map_err(|e| BackupError::Checksum(e.to_string()))??;
        debug!("Checksum for {}: {}", name, checksum);

        let archive_path = self.ctx.archive_path(name);
        let src = work.to_path_buf();
        let dest = archive_path.clone();
        tokio::task::spawn_blocking(move || archive::create_archive(&src, &dest))
            .await
            .map_err(|e| BackupError::Archive(e.to_string()))??;

        let verify_path = archive_path.clone();
        let entry_count = tokio::task::spawn_blocking(move || archive::verify_archive(&verify_path))
            .await
            .map_err(|e| BackupError::Verify(e.to_string()))??;
        debug!("Verified {}: {} archive entries", name, entry_count);

        let size_bytes = std::fs::metadata(&archive_path)?.len();

        Ok(BackupEntry::success(
            name,
            &self.ctx.run_ts,
            checksum,
            size_bytes,
            archive_path.display().to_string(),
        ))
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(BackupError::InvalidName("empty name".to_string()));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(BackupError::InvalidName(name.to_string()));
    }
    Ok(())
}
