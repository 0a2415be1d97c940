//! Content checksums for cloned repositories.

use crate::utils::errors::{BackupError, Result};
use sha2::{Digest, Sha256};
use std::path::Path;
use walkdir::WalkDir;

/// Compute a hex SHA-256 over every regular file under `root`.
///
/// Files are visited in sorted name order so the digest is deterministic
/// for identical tree contents regardless of directory-entry order.
pub fn hash_directory(root: &Path) -> Result<String> {
    let mut hasher = Sha256::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| BackupError::Checksum(e.to_string()))?;

        if !entry.file_type().is_file() {
            continue;
        }

        let bytes = std::fs::read(entry.path()).map_err(|e| {
            BackupError::Checksum(format!("{}: {}", entry.path().display(), e))
        })?;
        hasher.update(&bytes);
    }

    Ok(hex::encode(hasher.finalize()))
}
