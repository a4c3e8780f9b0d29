//! Domain migrators. Each one picks an [`ArtifactRule`] and pushes legacy
//! sources through generation, validation, placement and, when everything
//! else fails, stub synthesis.

pub mod bootstrap;
pub mod hardening;
pub mod ui;

use std::path::{ Path, PathBuf };

use log::{ error, info, warn };

use crate::config::MigrationOptions;
use crate::errors::MigrationResult;
use crate::implementations::gateway::OracleGateway;
use crate::implementations::{ fallback, java_syntax, resolver, validator };
use crate::models::artifact::TargetLocation;
use crate::models::conversation::ExpectedOutput;
use crate::models::rule::ArtifactRule;
use crate::traits::file_tree::FileTree;

/// Collaborators shared by every migrator within one run
pub struct MigrationContext<'a> {
    pub gateway: &'a OracleGateway,
    pub files: &'a dyn FileTree,
    pub options: &'a MigrationOptions,
}

/// Counts reported by a migrator run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigratorSummary {
    pub migrated: usize,
    /// Artifacts written as synthesized stubs (also counted in `migrated`)
    pub stubbed: usize,
    pub failed: usize,
}

impl MigratorSummary {
    pub fn merge(&mut self, other: MigratorSummary) {
        self.migrated += other.migrated;
        self.stubbed += other.stubbed;
        self.failed += other.failed;
    }
}

/// A validated artifact, or a stub when validation never succeeded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub content: String,
    pub is_stub: bool,
}

/// First and escalated prompt for one artifact
#[derive(Debug, Clone)]
pub struct ArtifactPrompts {
    pub initial: String,
    pub strict: String,
}

/// Where a migrated artifact ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactOutcome {
    pub path: PathBuf,
    pub is_stub: bool,
}

impl<'a> MigrationContext<'a> {
    pub fn new(gateway: &'a OracleGateway, files: &'a dyn FileTree, options: &'a MigrationOptions) -> Self {
        Self { gateway, files, options }
    }

    /// Legacy sources matching `pattern` under the source root
    pub fn sources(&self, pattern: &str) -> MigrationResult<Vec<PathBuf>> {
        self.files.list_matching(&self.options.source_root, pattern)
    }

    /// Migrate every legacy file selected by the rule's glob, one at a time.
    /// A failure aborts that artifact only.
    pub async fn migrate_all(&self, rule: ArtifactRule) -> MigrationResult<MigratorSummary> {
        let mut summary = MigratorSummary::default();
        let sources = self.sources(rule.source_glob())?;
        info!("Migrating {} {} file(s)", sources.len(), rule.label());

        for source in sources {
            match self.migrate_java_file(rule, &source).await {
                Ok(outcome) => {
                    summary.migrated += 1;
                    if outcome.is_stub {
                        summary.stubbed += 1;
                    }
                    info!("Migrated {}: {}", rule.label(), outcome.path.display());
                }
                Err(e) => {
                    summary.failed += 1;
                    error!("Failed to migrate {}: {}", source.display(), e);
                }
            }
        }

        Ok(summary)
    }

    /// Generate, validate, place and write one legacy Java source
    pub async fn migrate_java_file(&self, rule: ArtifactRule, source_path: &Path) -> MigrationResult<ArtifactOutcome> {
        let source = self.files.read(source_path)?;
        let file_name = source_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let type_name = source_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let relative = source_path.strip_prefix(&self.options.source_root).unwrap_or(source_path);
        let is_test = is_test_source(relative, &file_name);
        if is_test {
            info!("{} is a test; it goes to the test source tree", file_name);
        }

        let default_package = rule.default_package(&self.options.base_package);
        let fallback_package = resolver::resolve_package(source_path, &source, &default_package);
        let prompts = ArtifactPrompts {
            initial: rule.migration_prompt(&source, &type_name, is_test),
            strict: rule.strict_prompt(&source, &type_name),
        };
        let artifact = self.generate_validated(rule, &prompts, &type_name, &fallback_package).await;

        let location = resolver::resolve_location(source_path, &artifact.content, &default_package, &file_name, is_test);
        let path = self.write_with_fallback(rule, &location, &artifact.content)?;

        Ok(ArtifactOutcome { path, is_stub: artifact.is_stub })
    }

    /// The generation-validation loop.
    ///
    /// One initial query plus `artifact_retries` stricter ones; then a stub in
    /// `fallback_package`. No query is made once the stub is used.
    pub async fn generate_validated(
        &self,
        rule: ArtifactRule,
        prompts: &ArtifactPrompts,
        type_name: &str,
        fallback_package: &str
    ) -> GeneratedArtifact {
        let system = rule.system_instructions();
        let total = self.options.artifact_retries + 1;

        for attempt in 0..total {
            let prompt = if attempt == 0 { &prompts.initial } else { &prompts.strict };

            match self.gateway.query(prompt, &system, &ExpectedOutput::java()).await {
                Some(reply) => {
                    if let Some(content) = validator::validate(type_name, &reply, rule.accepted_kinds()) {
                        return GeneratedArtifact { content, is_stub: false };
                    }
                    warn!("Attempt {}/{}: generated {} {} failed validation", attempt + 1, total, rule.label(), type_name);
                }
                None => {
                    warn!("Attempt {}/{}: no usable reply for {} {}", attempt + 1, total, rule.label(), type_name);
                }
            }
        }

        error!("All {} attempts failed for {}; writing a stub for manual completion", total, type_name);
        GeneratedArtifact {
            content: fallback::synthesize(type_name, rule, fallback_package),
            is_stub: true,
        }
    }

    /// Write at `location`, or once more at the rule's default package location
    pub fn write_with_fallback(
        &self,
        rule: ArtifactRule,
        location: &TargetLocation,
        content: &str
    ) -> MigrationResult<PathBuf> {
        let target_root = &self.options.target_root;
        let primary = location.resolve(target_root);

        let first_error = match self.files.write(&primary, content) {
            Ok(()) => {
                return Ok(primary);
            }
            Err(e) => e,
        };

        let default_package = rule.default_package(&self.options.base_package);
        let fallback_location = TargetLocation::new(location.root_tree, &default_package, &location.file_name);
        let fallback_path = fallback_location.resolve(target_root);
        if fallback_path == primary {
            return Err(first_error);
        }

        warn!(
            "Error writing {}: {}; trying default location {}",
            primary.display(),
            first_error,
            fallback_path.display()
        );
        let content = resolver::correct_package(content, &default_package).unwrap_or_else(|| content.to_string());
        self.files.write(&fallback_path, &content)?;
        Ok(fallback_path)
    }

    /// Query for a non-Java file and write it verbatim; `None` when nothing usable came back
    pub async fn generate_text_file(
        &self,
        prompt: &str,
        system_instructions: &str,
        language: &str,
        relative_path: &Path
    ) -> MigrationResult<Option<PathBuf>> {
        let expected = ExpectedOutput::Code(language.to_string());
        let Some(text) = self.gateway.query(prompt, system_instructions, &expected).await else {
            warn!("No usable {} produced for {}; skipping", language, relative_path.display());
            return Ok(None);
        };

        let path = self.options.target_root.join(relative_path);
        self.files.write(&path, &text)?;
        Ok(Some(path))
    }
}

fn is_test_source(path: &Path, file_name: &str) -> bool {
    java_syntax::is_test_file_name(file_name) ||
        path
            .parent()
            .map(|parent| parent.iter().any(|segment| segment == "test"))
            .unwrap_or(false)
}
