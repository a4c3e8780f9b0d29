use std::path::Path;

use log::{ debug, info };

use crate::implementations::java_syntax;
use crate::models::artifact::TargetLocation;
use crate::models::common::RootTree;

/// Package for an artifact: its own declaration, else the directories under the
/// `java` root of `source_path`, else `default_package`.
pub fn resolve_package(source_path: &Path, content: &str, default_package: &str) -> String {
    if let Some(package) = java_syntax::extract_package(content) {
        debug!("Package {} taken from declaration", package);
        return package;
    }
    if let Some(package) = java_syntax::package_from_path(source_path) {
        debug!("Package {} inferred from path {}", package, source_path.display());
        return package;
    }
    debug!("Falling back to default package {}", default_package);
    default_package.to_string()
}

/// Where a migrated artifact is written
pub fn resolve_location(
    source_path: &Path,
    content: &str,
    default_package: &str,
    file_name: &str,
    is_test: bool
) -> TargetLocation {
    let package = resolve_package(source_path, content, default_package);
    let root = if is_test { RootTree::Test } else { RootTree::Main };
    TargetLocation::new(root, &package, file_name)
}

/// Expected package for a file proposed by a repair batch.
///
/// Paths under a `java` root give their directory package. Otherwise a couple of
/// directory-name heuristics pick a sub-package of `base_package`.
pub fn expected_package_for_repair(relative_path: &Path, base_package: &str) -> Option<String> {
    if let Some(package) = java_syntax::package_from_path(relative_path) {
        return Some(package);
    }

    let has_dir = |name: &str| {
        relative_path
            .parent()
            .map(|parent| parent.iter().any(|segment| segment == name))
            .unwrap_or(false)
    };

    if has_dir("model") {
        Some(format!("{}.model", base_package))
    } else if has_dir("data") {
        Some(format!("{}.data", base_package))
    } else {
        None
    }
}

/// Rewrite the package clause when it disagrees with `expected`.
/// Returns `None` when no change is needed or the content declares no package.
pub fn correct_package(content: &str, expected: &str) -> Option<String> {
    let current = java_syntax::extract_package(content)?;
    if current == expected {
        return None;
    }
    info!("Correcting package from {} to {}", current, expected);
    Some(java_syntax::replace_package(content, expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const FOO_REPO: &str = "package com.acme.old;\npublic interface FooRepo {}";

    fn foo_repo_path() -> PathBuf {
        PathBuf::from("target/src/main/java/com/acme/data/FooRepo.java")
    }

    #[test]
    fn declaration_beats_path_and_default() {
        assert_eq!(resolve_package(&foo_repo_path(), FOO_REPO, "org.default"), "com.acme.old");
    }

    #[test]
    fn path_used_without_declaration() {
        let content = "public interface FooRepo {}";
        assert_eq!(resolve_package(&foo_repo_path(), content, "org.default"), "com.acme.data");
    }

    #[test]
    fn default_used_without_declaration_or_marker() {
        let path = PathBuf::from("legacy/FooRepo.java");
        assert_eq!(resolve_package(&path, "public interface FooRepo {}", "org.default"), "org.default");
    }

    #[test]
    fn consistency_check_rewrites_to_path_package() {
        let expected = java_syntax::package_from_path(&foo_repo_path()).unwrap();
        let fixed = correct_package(FOO_REPO, &expected).unwrap();
        assert!(fixed.starts_with("package com.acme.data;"));
        assert_eq!(correct_package(&fixed, &expected), None);
    }

    #[test]
    fn repair_heuristics_without_java_root() {
        let base = "org.example";
        assert_eq!(
            expected_package_for_repair(Path::new("src/main/java/org/example/rest/A.java"), base).as_deref(),
            Some("org.example.rest")
        );
        assert_eq!(
            expected_package_for_repair(Path::new("generated/model/Member.java"), base).as_deref(),
            Some("org.example.model")
        );
        assert_eq!(
            expected_package_for_repair(Path::new("generated/data/MemberRepository.java"), base).as_deref(),
            Some("org.example.data")
        );
        assert_eq!(expected_package_for_repair(Path::new("Other.java"), base), None);
    }

    #[test]
    fn location_follows_resolved_package() {
        let location = resolve_location(
            Path::new("legacy/src/main/java/org/jboss/model/Member.java"),
            "public class Member {}",
            "org.default.model",
            "Member.java",
            false
        );
        assert_eq!(location.relative_path(), PathBuf::from("src/main/java/org/jboss/model/Member.java"));
    }
}
