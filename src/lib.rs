pub mod models;
pub mod traits;
pub mod errors;
pub mod config;
pub mod implementations;
#[cfg(test)]
pub mod tests;

// Re-export core components
pub use config::MigrationOptions;
pub use errors::{ MigrationError, MigrationResult };
pub use implementations::config::{ MigrationConfig, OracleCredentials };
pub use implementations::file_tree::LocalFileTree;
pub use implementations::gateway::OracleGateway;
pub use implementations::git_manager::GitManager;
pub use implementations::llm_client::LlmOracle;
pub use implementations::normalizer::{ normalize_tree, NormalizationReport };
pub use implementations::orchestrator::PhaseOrchestrator;
pub use implementations::test_runner::CommandTestRunner;
pub use implementations::validator::validate;
pub use models::{
    common::{ DeclKind, RootTree },
    artifact::{ CodeArtifact, TargetLocation },
    phase::{ GateOutcome, MigrationReport, PhaseId, PhaseResult },
    repair::RepairBatch,
    rule::ArtifactRule,
};
pub use traits::{ FileTree, FixedAnswer, OperatorPrompt, OracleError, TestRun, TestRunner, TextOracle, VersionControl };
