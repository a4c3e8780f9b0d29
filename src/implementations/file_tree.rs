use std::fs;
use std::path::{ Path, PathBuf };

use globset::{ GlobBuilder, GlobMatcher };
use log::{ debug, warn };
use walkdir::WalkDir;

use crate::errors::{ MigrationError, MigrationResult };
use crate::traits::file_tree::FileTree;

/// `FileTree` over the local disk
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileTree;

impl LocalFileTree {
    pub fn new() -> Self {
        LocalFileTree
    }
}

/// Compile a glob where `*` and `?` stay within one path segment and `**/` spans directories
pub fn compile_glob(pattern: &str) -> MigrationResult<GlobMatcher> {
    let glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| MigrationError::InvalidInput(format!("bad glob {}: {}", pattern, e)))?;
    Ok(glob.compile_matcher())
}

impl FileTree for LocalFileTree {
    fn read(&self, path: &Path) -> MigrationResult<String> {
        fs::read_to_string(path).map_err(|e| MigrationError::fs(path, e))
    }

    fn write(&self, path: &Path, content: &str) -> MigrationResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| MigrationError::fs(parent, e))?;
        }
        fs::write(path, content).map_err(|e| MigrationError::fs(path, e))?;
        debug!("Wrote {} ({} characters)", path.display(), content.len());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove(&self, path: &Path) -> MigrationResult<()> {
        fs::remove_file(path).map_err(|e| MigrationError::fs(path, e))
    }

    fn create_dir_all(&self, path: &Path) -> MigrationResult<()> {
        fs::create_dir_all(path).map_err(|e| MigrationError::fs(path, e))
    }

    fn list_matching(&self, root: &Path, pattern: &str) -> MigrationResult<Vec<PathBuf>> {
        let matcher = compile_glob(pattern)?;
        if !root.exists() {
            warn!("Directory {} does not exist", root.display());
            return Ok(Vec::new());
        }

        let mut matches: Vec<PathBuf> = WalkDir::new(root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .path()
                    .strip_prefix(root)
                    .map(|relative| matcher.is_match(relative))
                    .unwrap_or(false)
            })
            .map(|entry| entry.into_path())
            .collect();

        matches.sort();
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_semantics() {
        let model = compile_glob("**/model/*.java").unwrap();
        assert!(model.is_match("src/main/java/org/x/model/Member.java"));
        assert!(model.is_match("model/Member.java"));
        assert!(!model.is_match("src/main/java/org/x/model/sub/Member.java"));

        let repos = compile_glob("**/data/*Repository.java").unwrap();
        assert!(repos.is_match("a/data/MemberRepository.java"));
        assert!(!repos.is_match("a/data/MemberListProducer.java"));
    }

    #[test]
    fn single_star_does_not_cross_directories() {
        let top = compile_glob("src/*.java").unwrap();
        assert!(top.is_match("src/Member.java"));
        assert!(!top.is_match("src/model/Member.java"));
        assert!(matches!(compile_glob("src/[.java"), Err(MigrationError::InvalidInput(_))));
    }

    #[test]
    fn write_creates_parents_and_listing_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let tree = LocalFileTree::new();
        tree.write(&dir.path().join("src/b/model/B.java"), "b").unwrap();
        tree.write(&dir.path().join("src/a/model/A.java"), "a").unwrap();
        tree.write(&dir.path().join("src/a/model/notes.txt"), "n").unwrap();

        let found = tree.list_matching(dir.path(), "**/model/*.java").unwrap();
        assert_eq!(found, vec![dir.path().join("src/a/model/A.java"), dir.path().join("src/b/model/B.java")]);
        assert_eq!(tree.read(&found[0]).unwrap(), "a");
    }

    #[test]
    fn missing_root_lists_nothing() {
        let tree = LocalFileTree::new();
        assert!(tree.list_matching(Path::new("/definitely/missing/root"), "**/*.java").unwrap().is_empty());
    }
}
