use std::path::PathBuf;

use crate::implementations::config::MigrationConfig;

/// Options for one migration run, derived from the loaded configuration
#[derive(Debug, Clone)]
pub struct MigrationOptions {
    /// Root of the legacy JBoss project
    pub source_root: PathBuf,
    /// Root of the Spring Boot project being produced
    pub target_root: PathBuf,

    pub base_package: String,
    pub group_id: String,
    pub artifact_id: String,
    pub application_class: String,

    pub gateway_attempts: usize,
    pub artifact_retries: usize,
    pub test_attempts: usize,
    pub comprehensive_after: usize,
    pub comprehensive_file_limit: usize,

    pub max_prompt_chars: usize,
    pub test_output_chars: usize,
    pub comprehensive_output_chars: usize,
    pub file_excerpt_chars: usize,
}

impl MigrationOptions {
    pub fn new(source_root: impl Into<PathBuf>, target_root: impl Into<PathBuf>, config: &MigrationConfig) -> Self {
        Self {
            source_root: source_root.into(),
            target_root: target_root.into(),
            base_package: config.project.base_package.clone(),
            group_id: config.project.group_id.clone(),
            artifact_id: config.project.artifact_id.clone(),
            application_class: config.project.application_class.clone(),
            gateway_attempts: config.retry.gateway_attempts.max(1),
            artifact_retries: config.retry.artifact_retries,
            test_attempts: config.retry.test_attempts,
            comprehensive_after: config.retry.comprehensive_after,
            comprehensive_file_limit: config.retry.comprehensive_file_limit,
            max_prompt_chars: config.limits.max_prompt_chars,
            test_output_chars: config.limits.test_output_chars,
            comprehensive_output_chars: config.limits.comprehensive_output_chars,
            file_excerpt_chars: config.limits.file_excerpt_chars,
        }
    }

    /// `src/test/java/<base package path>` under the target root
    pub fn test_package_root(&self) -> PathBuf {
        let mut path = self.target_root.join("src/test/java");
        for segment in self.base_package.split('.') {
            path.push(segment);
        }
        path
    }
}
