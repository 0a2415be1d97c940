//! Repository acquisition seam.
//!
//! The runner only needs "identifier in, local directory out"; the trait
//! keeps the git transport swappable so tests can use a local fixture
//! source instead of the network.

use crate::utils::errors::{BackupError, Result};
use async_trait::async_trait;
use std::path::Path;

/// Produces a local copy of a named repository at `dest`.
#[async_trait]
pub trait RepoSource: Send + Sync {
    async fn fetch(&self, name: &str, dest: &Path) -> Result<()>;
}

/// Clones repositories with the `git` binary.
pub struct GitSource {
    remote: String,
    depth: Option<u32>,
}

impl GitSource {
    pub fn new(remote: String, depth: Option<u32>) -> Self {
        Self { remote, depth }
    }

    fn clone_url(&self, name: &str) -> String {
        format!("{}/{}.git", self.remote.trim_end_matches('/'), name)
    }
}

#[async_trait]
impl RepoSource for GitSource {
    async fn fetch(&self, name: &str, dest: &Path) -> Result<()> {
        let mut cmd = tokio::process::Command::new("git");
        cmd.arg("clone").arg("--quiet");

        if let Some(depth) = self.depth {
            cmd.arg("--depth").arg(depth.to_string());
        }

        cmd.arg(self.clone_url(name)).arg(dest);

        let output = cmd
            .output()
            .await
            .map_err(|e| BackupError::Clone(format!("failed to spawn git: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BackupError::Clone(stderr.trim().to_string()));
        }

        Ok(())
    }
}
