use std::path::{ Path, PathBuf };

use crate::errors::MigrationResult;

/// File-system primitives the migration core relies on
pub trait FileTree: Send + Sync {
    fn read(&self, path: &Path) -> MigrationResult<String>;

    /// Write a file, creating intermediate directories
    fn write(&self, path: &Path, content: &str) -> MigrationResult<()>;

    fn exists(&self, path: &Path) -> bool;

    fn remove(&self, path: &Path) -> MigrationResult<()>;

    fn create_dir_all(&self, path: &Path) -> MigrationResult<()>;

    /// Files under `root` matching a glob such as `**/model/*.java`, in stable order
    fn list_matching(&self, root: &Path, pattern: &str) -> MigrationResult<Vec<PathBuf>>;
}
