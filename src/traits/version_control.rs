use async_trait::async_trait;

use crate::errors::MigrationResult;

/// Checkpoints and commits at phase boundaries. Results are only logged.
#[async_trait]
pub trait VersionControl: Send + Sync {
    async fn init_repository(&self) -> MigrationResult<()>;

    async fn create_checkpoint(&self, name: &str) -> MigrationResult<()>;

    async fn commit(&self, message: &str) -> MigrationResult<()>;
}
