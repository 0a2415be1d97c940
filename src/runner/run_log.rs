//! Run log types — the per-run record of what was backed up.
//!
//! One `RunLog` is written per run as `backup_log_<RUN_TS>.json` in the
//! run's backup directory, holding one `BackupEntry` per repository.

use crate::utils::errors::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Outcome of a single repository backup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Success,
    Failed,
}

/// Overall outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Every repository succeeded (including the empty run)
    Completed,
    /// Mixed successes and failures
    Partial,
    /// Every repository failed
    Failed,
}

/// Per-repository result. Immutable once appended to the run log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupEntry {
    pub name: String,
    /// Run timestamp (`YYYYMMDD_HHMMSS` UTC), shared by all entries of a run
    pub timestamp: String,
    pub status: EntryStatus,
    pub checksum: Option<String>,
    pub size_bytes: Option<u64>,
    pub archive_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BackupEntry {
    pub fn success(
        name: &str,
        run_ts: &str,
        checksum: String,
        size_bytes: u64,
        archive_path: String,
    ) -> Self {
        Self {
            name: name.to_string(),
            timestamp: run_ts.to_string(),
            status: EntryStatus::Success,
            checksum: Some(checksum),
            size_bytes: Some(size_bytes),
            archive_path: Some(archive_path),
            error: None,
        }
    }

    pub fn failed(name: &str, run_ts: &str, error: String) -> Self {
        Self {
            name: name.to_string(),
            timestamp: run_ts.to_string(),
            status: EntryStatus::Failed,
            checksum: None,
            size_bytes: None,
            archive_path: None,
            error: Some(error),
        }
    }
}

/// Counts derived from the entries at finalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
}

/// The full record of one run. Entries are appended as repositories
/// complete; `finalize` computes the summary and terminal status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLog {
    /// Run start time, ISO-8601
    pub timestamp: String,
    #[serde(rename = "repositories")]
    pub entries: Vec<BackupEntry>,
    pub status: RunStatus,
    pub summary: Summary,
    pub errors: Vec<String>,
}

impl RunLog {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            timestamp: started_at.to_rfc3339(),
            entries: Vec::new(),
            status: RunStatus::Completed,
            summary: Summary::default(),
            errors: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: BackupEntry) {
        if let Some(error) = &entry.error {
            self.errors.push(format!("{}: {}", entry.name, error));
        }
        self.entries.push(entry);
    }

    /// Compute the summary and terminal status from the entries.
    pub fn finalize(&mut self) {
        let total = self.entries.len();
        let success = self
            .entries
            .iter()
            .filter(|e| e.status == EntryStatus::Success)
            .count();
        let failed = total - success;

        self.summary = Summary {
            total,
            success,
            failed,
        };
        self.status = if failed == 0 {
            RunStatus::Completed
        } else if success == 0 {
            RunStatus::Failed
        } else {
            RunStatus::Partial
        };
    }

    /// Persist the log as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success_entry(name: &str) -> BackupEntry {
        BackupEntry::success(
            name,
            "20260829_120000",
            "ab".repeat(32),
            1024,
            format!("backups/20260829_120000/{}_20260829_120000.tar.gz", name),
        )
    }

    fn failed_entry(name: &str) -> BackupEntry {
        BackupEntry::failed(name, "20260829_120000", "Clone failed: not found".to_string())
    }

    #[test]
    fn test_finalize_all_success() {
        let mut log = RunLog::new(Utc::now());
        log.push(success_entry("alpha"));
        log.push(success_entry("beta"));
        log.finalize();

        assert_eq!(log.status, RunStatus::Completed);
        assert_eq!(log.summary, Summary { total: 2, success: 2, failed: 0 });
        assert!(log.errors.is_empty());
    }

    #[test]
    fn test_finalize_mixed() {
        let mut log = RunLog::new(Utc::now());
        log.push(success_entry("alpha"));
        log.push(failed_entry("beta"));
        log.finalize();

        assert_eq!(log.status, RunStatus::Partial);
        assert_eq!(log.summary, Summary { total: 2, success: 1, failed: 1 });
        assert_eq!(log.errors.len(), 1);
        assert!(log.errors[0].starts_with("beta:"));
    }

    #[test]
    fn test_finalize_all_failed() {
        let mut log = RunLog::new(Utc::now());
        log.push(failed_entry("alpha"));
        log.finalize();

        assert_eq!(log.status, RunStatus::Failed);
        assert_eq!(log.summary, Summary { total: 1, success: 0, failed: 1 });
    }

    #[test]
    fn test_finalize_empty_run() {
        let mut log = RunLog::new(Utc::now());
        log.finalize();

        assert_eq!(log.status, RunStatus::Completed);
        assert_eq!(log.summary, Summary { total: 0, success: 0, failed: 0 });
        assert!(log.entries.is_empty());
    }

    #[test]
    fn test_summary_invariants() {
        let mut log = RunLog::new(Utc::now());
        log.push(success_entry("a"));
        log.push(failed_entry("b"));
        log.push(success_entry("c"));
        log.finalize();

        assert_eq!(log.summary.total, log.entries.len());
        assert_eq!(log.summary.success + log.summary.failed, log.summary.total);
        for entry in log.entries.iter().filter(|e| e.status == EntryStatus::Success) {
            assert!(entry.checksum.is_some());
            assert!(entry.size_bytes.is_some());
            assert!(entry.archive_path.is_some());
        }
    }

    #[test]
    fn test_json_shape() {
        let mut log = RunLog::new(Utc::now());
        log.push(success_entry("alpha"));
        log.finalize();

        let json: serde_json::Value = serde_json::to_value(&log).unwrap();
        assert!(json["repositories"].is_array());
        assert_eq!(json["status"], "completed");
        assert_eq!(json["summary"]["total"], 1);
        assert_eq!(json["repositories"][0]["status"], "success");
        // Successful entries carry no error field at all
        assert!(json["repositories"][0].get("error").is_none());
    }
}
