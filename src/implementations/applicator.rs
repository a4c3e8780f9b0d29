use std::path::{ Component, Path, PathBuf };

use log::{ debug, error, info, warn };

use crate::errors::MigrationResult;
use crate::implementations::{ java_syntax, resolver };
use crate::models::common::RootTree;
use crate::models::repair::{ FileChange, RepairBatch };
use crate::traits::file_tree::FileTree;

/// Turns an oracle repair reply into file writes under the target root
pub struct SolutionApplicator<'a> {
    files: &'a dyn FileTree,
    target_root: &'a Path,
    base_package: &'a str,
}

impl<'a> SolutionApplicator<'a> {
    pub fn new(files: &'a dyn FileTree, target_root: &'a Path, base_package: &'a str) -> Self {
        Self { files, target_root, base_package }
    }

    /// Apply a repair reply.
    ///
    /// Returns true when the batch parsed and at least one file was written.
    /// A malformed batch writes nothing. A write error stops the batch; files
    /// written before it stay written.
    pub fn apply(&self, response: &str) -> bool {
        let Some(batch) = parse_batch(response) else {
            return false;
        };

        if !batch.analysis.is_empty() {
            info!("Repair analysis: {}", batch.analysis);
        }
        if batch.is_empty() {
            warn!("Repair batch contains no files");
            return false;
        }

        match self.apply_batch(&batch) {
            Ok(written) => {
                if !batch.explanation.is_empty() {
                    info!("Repair explanation: {}", batch.explanation);
                }
                info!("Applied repair batch: {} file(s) written", written);
                written > 0
            }
            Err(e) => {
                error!("Error applying repair batch: {}", e);
                false
            }
        }
    }

    fn apply_batch(&self, batch: &RepairBatch) -> MigrationResult<usize> {
        let mut written = 0;

        for change in &batch.files_to_modify {
            if self.apply_modification(change)? {
                written += 1;
            }
        }

        for change in &batch.additional_files {
            let relative = Path::new(&change.file_path);
            if !is_safe_relative(relative) {
                warn!("Skipping additional file with unsafe path: {}", change.file_path);
                continue;
            }
            self.files.write(&self.target_root.join(relative), &change.code)?;
            info!("Created file: {}", change.file_path);
            written += 1;
        }

        Ok(written)
    }

    /// Returns whether a file was written
    fn apply_modification(&self, change: &FileChange) -> MigrationResult<bool> {
        let relative = Path::new(&change.file_path);
        if !is_safe_relative(relative) {
            warn!("Skipping file with unsafe path: {}", change.file_path);
            return Ok(false);
        }

        let is_java = relative.extension().map(|ext| ext == "java").unwrap_or(false);
        if !is_java {
            self.files.write(&self.target_root.join(relative), &change.code)?;
            info!("Updated file: {}", change.file_path);
            return Ok(true);
        }

        if java_syntax::starts_with_explanation(&change.code) {
            warn!("Skipping {}: content is explanatory text, not Java code", change.file_path);
            return Ok(false);
        }

        let file_name = relative
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let stem = relative
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let mut code = change.code.clone();

        if let Some(decl) = java_syntax::public_declarations(&code).into_iter().next() {
            if decl.name != stem {
                warn!("Renaming {} {} to {} in {}", decl.kind, decl.name, stem, change.file_path);
                code = java_syntax::rename_declaration(&code, &decl, &stem);
            }
        }

        if let Some(expected) = resolver::expected_package_for_repair(relative, self.base_package) {
            if let Some(fixed) = resolver::correct_package(&code, &expected) {
                code = fixed;
            }
        }

        let destination = self.destination_for(relative, &file_name);
        self.files.write(&self.target_root.join(&destination), &code)?;
        info!("Updated file: {}", destination.display());
        Ok(true)
    }

    /// Test files proposed for the main tree are redirected to the test tree
    fn destination_for(&self, relative: &Path, file_name: &str) -> PathBuf {
        if java_syntax::is_test_file_name(file_name) && java_syntax::root_tree_of(relative) == Some(RootTree::Main) {
            if let Some(rerouted) = java_syntax::reroute_to_test_tree(relative) {
                info!("Rerouting test file {} to {}", relative.display(), rerouted.display());
                return rerouted;
            }
        }
        relative.to_path_buf()
    }
}

/// Parse the JSON object spanning the first `{` to the last `}`
pub fn parse_batch(response: &str) -> Option<RepairBatch> {
    let (Some(start), Some(end)) = (response.find('{'), response.rfind('}')) else {
        error!("No JSON object found in repair response");
        return None;
    };
    if end < start {
        error!("No JSON object found in repair response");
        return None;
    }

    match serde_json::from_str::<RepairBatch>(&response[start..=end]) {
        Ok(batch) => {
            debug!(
                "Parsed repair batch: {} modification(s), {} new file(s)",
                batch.files_to_modify.len(),
                batch.additional_files.len()
            );
            Some(batch)
        }
        Err(e) => {
            error!("Failed to parse repair batch: {}", e);
            None
        }
    }
}

fn is_safe_relative(path: &Path) -> bool {
    !path.as_os_str().is_empty() &&
        path.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
