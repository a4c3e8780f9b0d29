use std::path::{ Path, PathBuf };

use crate::implementations::java_syntax;
use crate::models::common::{ DeclKind, RootTree };

/// A single generated unit of source text, with what could be read off it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeArtifact {
    pub raw_text: String,
    pub declared_type_name: Option<String>,
    pub declared_kind: DeclKind,
    pub package_declaration: Option<String>,
}

impl CodeArtifact {
    /// Inspect raw text and record its first public top-level declaration and package
    pub fn parse(raw_text: &str) -> Self {
        let first = java_syntax::public_declarations(raw_text).into_iter().next();

        Self {
            raw_text: raw_text.to_string(),
            declared_type_name: first.as_ref().map(|d| d.name.clone()),
            declared_kind: first.map(|d| d.kind).unwrap_or(DeclKind::Unknown),
            package_declaration: java_syntax::extract_package(raw_text),
        }
    }
}

/// Where an artifact lands in the target tree. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLocation {
    pub root_tree: RootTree,
    pub package_path: Vec<String>,
    pub file_name: String,
}

impl TargetLocation {
    pub fn new(root_tree: RootTree, package: &str, file_name: &str) -> Self {
        Self {
            root_tree,
            package_path: package
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            file_name: file_name.to_string(),
        }
    }

    /// Path relative to the target project root
    pub fn relative_path(&self) -> PathBuf {
        let mut path = PathBuf::from(self.root_tree.java_root());
        for segment in &self.package_path {
            path.push(segment);
        }
        path.push(&self.file_name);
        path
    }

    pub fn resolve(&self, target_root: &Path) -> PathBuf {
        target_root.join(self.relative_path())
    }
}
