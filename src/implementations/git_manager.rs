use std::path::PathBuf;

use async_trait::async_trait;
use log::{ debug, info };
use tokio::process::Command;

use crate::errors::{ MigrationError, MigrationResult };
use crate::traits::version_control::VersionControl;

/// Drives the `git` binary inside the target project
pub struct GitManager {
    repo_dir: PathBuf,
}

impl GitManager {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self { repo_dir: repo_dir.into() }
    }

    async fn git(&self, args: &[&str]) -> MigrationResult<String> {
        debug!("git {}", args.join(" "));
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .output().await
            .map_err(|e| MigrationError::VersionControl(format!("failed to run git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MigrationError::VersionControl(format!("git {} failed: {}", args.join(" "), stderr.trim())));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl VersionControl for GitManager {
    async fn init_repository(&self) -> MigrationResult<()> {
        if self.repo_dir.join(".git").exists() {
            debug!("Git repository already present in {}", self.repo_dir.display());
            return Ok(());
        }
        self.git(&["init"]).await?;
        info!("Initialized git repository in {}", self.repo_dir.display());
        Ok(())
    }

    async fn create_checkpoint(&self, name: &str) -> MigrationResult<()> {
        self.git(&["checkout", "-b", name]).await?;
        info!("Created branch: {}", name);
        Ok(())
    }

    async fn commit(&self, message: &str) -> MigrationResult<()> {
        self.git(&["add", "."]).await?;
        self.git(&["commit", "-m", message]).await?;
        info!("Committed changes: {}", message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn configured_repo() -> (tempfile::TempDir, GitManager) {
        let dir = tempfile::tempdir().unwrap();
        let git = GitManager::new(dir.path());
        git.init_repository().await.unwrap();
        git.git(&["config", "user.name", "test-user"]).await.unwrap();
        git.git(&["config", "user.email", "test@example.com"]).await.unwrap();
        (dir, git)
    }

    #[tokio::test]
    async fn init_is_skipped_when_repository_exists() {
        let (dir, git) = configured_repo().await;
        assert!(dir.path().join(".git").exists());
        git.init_repository().await.unwrap();
    }

    #[tokio::test]
    async fn checkpoint_then_commit() {
        let (dir, git) = configured_repo().await;
        std::fs::write(dir.path().join("pom.xml"), "<project/>").unwrap();

        git.create_checkpoint("phase1-data-layer").await.unwrap();
        git.commit("Phase 1: Data Layer Migration completed").await.unwrap();

        let branch = git.git(&["rev-parse", "--abbrev-ref", "HEAD"]).await.unwrap();
        assert_eq!(branch, "phase1-data-layer");
        let subject = git.git(&["log", "-1", "--format=%s"]).await.unwrap();
        assert_eq!(subject, "Phase 1: Data Layer Migration completed");
    }
}
