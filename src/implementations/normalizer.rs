use std::path::PathBuf;

use log::{ debug, info, warn };

use crate::config::MigrationOptions;
use crate::errors::MigrationResult;
use crate::implementations::{ java_syntax, resolver };
use crate::models::common::RootTree;
use crate::traits::file_tree::FileTree;

/// What a normalization pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    /// (from, to) pairs, relative to the target root
    pub moved: Vec<(PathBuf, PathBuf)>,
    /// Files whose package clause was rewritten, relative to the target root
    pub repackaged: Vec<PathBuf>,
}

impl NormalizationReport {
    pub fn is_clean(&self) -> bool {
        self.moved.is_empty() && self.repackaged.is_empty()
    }
}

/// Structural pre-pass over the target tree, run before a phase's first test run.
///
/// Moves test-named files out of the main tree, aligns package clauses with
/// directories and makes sure the test root for the base package exists.
/// A second pass over the same tree changes nothing.
pub fn normalize_tree(files: &dyn FileTree, options: &MigrationOptions) -> MigrationResult<NormalizationReport> {
    let target_root = &options.target_root;
    let mut report = NormalizationReport::default();

    files.create_dir_all(&options.test_package_root())?;

    for path in files.list_matching(target_root, "**/*.java")? {
        let Ok(relative) = path.strip_prefix(target_root).map(|p| p.to_path_buf()) else {
            continue;
        };
        let file_name = relative
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let mut relative = relative;
        let mut content = files.read(&path)?;

        if java_syntax::is_test_file_name(&file_name) && java_syntax::root_tree_of(&relative) == Some(RootTree::Main) {
            if let Some(rerouted) = java_syntax::reroute_to_test_tree(&relative) {
                let destination = target_root.join(&rerouted);
                if files.exists(&destination) {
                    warn!("{} already exists; overwriting it with {}", rerouted.display(), relative.display());
                }
                info!("Moving test file {} to {}", relative.display(), rerouted.display());
                files.write(&destination, &content)?;
                files.remove(&path)?;
                report.moved.push((relative.clone(), rerouted.clone()));
                relative = rerouted;
            }
        }

        if java_syntax::root_tree_of(&relative).is_none() {
            continue;
        }
        let Some(expected) = java_syntax::package_from_path(&relative) else {
            continue;
        };
        if let Some(fixed) = resolver::correct_package(&content, &expected) {
            files.write(&target_root.join(&relative), &fixed)?;
            report.repackaged.push(relative.clone());
            content = fixed;
        }
        debug!("Checked {} ({} characters)", relative.display(), content.len());
    }

    info!(
        "Normalized target tree: {} file(s) moved, {} package declaration(s) fixed",
        report.moved.len(),
        report.repackaged.len()
    );
    Ok(report)
}
