use async_trait::async_trait;
use thiserror::Error;

use crate::errors::MigrationError;
use crate::models::conversation::ChatMessage;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("API error: {0}")] ApiError(String),

    #[error("Missing API credential: {0}")] MissingCredential(String),

    #[error("Failed to parse API response: {0}")] ParseError(String),

    #[error("Network error: {0}")] NetworkError(String),

    #[error("HTTP error: {status} - {message}")] HttpError {
        status: u16,
        message: String,
    },
}

impl From<OracleError> for MigrationError {
    fn from(err: OracleError) -> Self {
        match err {
            OracleError::MissingCredential(msg) => MigrationError::Config(msg),
            other => MigrationError::Oracle(other.to_string()),
        }
    }
}

/// The external text-generation service. Treated as unreliable.
#[async_trait]
pub trait TextOracle: Send + Sync {
    /// Send a conversation and return the assistant's reply text.
    ///
    /// Any non-success response is an error for this call only.
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, OracleError>;

    /// Model identifier, for diagnostics
    fn model(&self) -> &str;
}
