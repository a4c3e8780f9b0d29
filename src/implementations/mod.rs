pub mod config;
pub mod java_syntax;
pub mod validator;
pub mod resolver;
pub mod fallback;
pub mod gateway;
pub mod applicator;
pub mod normalizer;
pub mod test_gate;
pub mod migrators;
pub mod orchestrator;
pub mod llm_client;
pub mod git_manager;
pub mod test_runner;
pub mod file_tree;
