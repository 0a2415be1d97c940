//! Archive creation and verification.
//!
//! Backups are gzip-compressed tarballs. Verification re-reads the table
//! of contents (the `tar -tzf` equivalent) without extracting anything.

use crate::utils::errors::{BackupError, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::path::Path;

/// Pack the directory at `src` into a `.tar.gz` at `dest`.
pub fn create_archive(src: &Path, dest: &Path) -> Result<()> {
    let file = File::create(dest)
        .map_err(|e| BackupError::Archive(format!("{}: {}", dest.display(), e)))?;
    let encoder = GzEncoder::new(file, Compression::default());

    let mut builder = tar::Builder::new(encoder);
    builder.follow_symlinks(false);
    builder
        .append_dir_all(".", src)
        .map_err(|e| BackupError::Archive(e.to_string()))?;

    let encoder = builder
        .into_inner()
        .map_err(|e| BackupError::Archive(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| BackupError::Archive(e.to_string()))?;

    Ok(())
}

/// Walk the archive's table of contents; returns the entry count.
///
/// Fails if the file is not a readable gzip tar stream.
pub fn verify_archive(path: &Path) -> Result<usize> {
    let file = File::open(path)
        .map_err(|e| BackupError::Verify(format!("{}: {}", path.display(), e)))?;
    let decoder = GzDecoder::new(file);
    let mut archive = tar::Archive::new(decoder);

    let mut count = 0;
    let entries = archive
        .entries()
        .map_err(|e| BackupError::Verify(e.to_string()))?;
    for entry in entries {
        entry.map_err(|e| BackupError::Verify(e.to_string()))?;
        count += 1;
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_create_then_verify() -> std::io::Result<()> {
        let src = TempDir::new()?;
        fs::create_dir(src.path().join("sub"))?;
        fs::write(src.path().join("file1.txt"), b"content1")?;
        fs::write(src.path().join("sub/file2.txt"), b"content2")?;

        let out = TempDir::new()?;
        let archive_path = out.path().join("repo_20260829_120000.tar.gz");

        create_archive(src.path(), &archive_path).unwrap();
        assert!(archive_path.exists());
        assert!(fs::metadata(&archive_path)?.len() > 0);

        let count = verify_archive(&archive_path).unwrap();
        // At least the two files; directory entries may add more
        assert!(count >= 2);

        Ok(())
    }

    #[test]
    fn test_archive_round_trips_contents() -> std::io::Result<()> {
        let src = TempDir::new()?;
        fs::write(src.path().join("data.txt"), b"round trip")?;

        let out = TempDir::new()?;
        let archive_path = out.path().join("repo.tar.gz");
        create_archive(src.path(), &archive_path).unwrap();

        let file = File::open(&archive_path)?;
        let mut archive = tar::Archive::new(GzDecoder::new(file));
        let mut found = false;
        for entry in archive.entries()? {
            let mut entry = entry?;
            if entry.path()?.ends_with("data.txt") {
                let mut contents = String::new();
                entry.read_to_string(&mut contents)?;
                assert_eq!(contents, "round trip");
                found = true;
            }
        }
        assert!(found);

        Ok(())
    }

    #[test]
    fn test_verify_rejects_garbage() -> std::io::Result<()> {
        let out = TempDir::new()?;
        let path = out.path().join("not-an-archive.tar.gz");
        fs::write(&path, b"this is not gzip data")?;

        let result = verify_archive(&path);
        assert!(matches!(result, Err(BackupError::Verify(_))));

        Ok(())
    }

    #[test]
    fn test_verify_missing_file() {
        let result = verify_archive(Path::new("/nonexistent/archive.tar.gz"));
        assert!(matches!(result, Err(BackupError::Verify(_))));
    }
}
