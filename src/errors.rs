use std::path::PathBuf;

use thiserror::Error;

/// Custom error types for the migration pipeline
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Oracle error: {0}")]
    Oracle(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error at {path}: {source}")]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Version control error: {0}")]
    VersionControl(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl MigrationError {
    /// Wrap an I/O error together with the path it happened on
    pub fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MigrationError::FileSystem {
            path: path.into(),
            source,
        }
    }
}

/// Result type specific to migration operations
pub type MigrationResult<T> = Result<T, MigrationError>;
