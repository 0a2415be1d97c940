//! Retention cleanup for old backup run directories.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use std::path::Path;
use tracing::{info, warn};

/// Directory name format shared with the runner
pub const RUN_TS_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Delete run directories under `root` strictly older than `retention_days`.
///
/// Directory names that do not parse as a run timestamp are skipped, never
/// deleted. Returns the number of directories removed; idempotent.
pub fn cleanup_old_backups(
    root: &Path,
    retention_days: i64,
    now: DateTime<Utc>,
) -> std::io::Result<usize> {
    if !root.exists() {
        return Ok(0);
    }

    let cutoff = Duration::days(retention_days);
    let mut removed = 0;

    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }

        let name = entry.file_name();
        let name = name.to_string_lossy();
        let run_ts = match NaiveDateTime::parse_from_str(&name, RUN_TS_FORMAT) {
            Ok(ts) => ts.and_utc(),
            // Unknown format: preserve, not safe to assume it is ours
            Err(_) => continue,
        };

        if now - run_ts > cutoff {
            match std::fs::remove_dir_all(entry.path()) {
                Ok(()) => {
                    info!("Removed old backup directory: {}", name);
                    removed += 1;
                }
                Err(e) => {
                    warn!("Failed to remove {}: {}", name, e);
                }
            }
        }
    }

    Ok(removed)
}
