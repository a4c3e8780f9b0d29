pub mod oracle;
pub mod file_tree;
pub mod version_control;
pub mod test_runner;
pub mod operator;

// Re-export traits
pub use oracle::{ OracleError, TextOracle };
pub use file_tree::FileTree;
pub use version_control::VersionControl;
pub use test_runner::{ TestRun, TestRunner };
pub use operator::{ FixedAnswer, OperatorPrompt };
