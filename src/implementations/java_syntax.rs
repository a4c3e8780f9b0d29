//! Pattern-matching helpers over generated Java source.
//!
//! Everything here is a pure function from text (or a path) to text or
//! matches, so it can be tested without an oracle or a file system.

use std::path::{ Component, Path, PathBuf };

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::common::{ DeclKind, RootTree };

/// Directory segment under which package hierarchies begin
pub const ROOT_MARKER: &str = "java";

/// Marker appended when extra top-level declarations are cut off
pub const DUPLICATE_MARKER: &str = "// Additional code removed due to duplicate type declaration";

/// Openings that identify an oracle reply as prose rather than code
pub const EXPLANATION_INDICATORS: [&str; 7] = [
    "This cannot be provided",
    "I cannot provide",
    "Here is the",
    "The file should",
    "This is a",
    "This code",
    "Without seeing",
];

static PUBLIC_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\bpublic\s+(?:(?:abstract|final|static|sealed|strictfp)\s+)*(class|interface|enum)\s+([A-Za-z_$][\w$]*)"
    ).expect("valid declaration pattern")
});

static ANY_TYPE_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\s)(?:(?:public|private|protected)\s+)?(?:class|interface|enum)\s+[A-Za-z_$][\w$]*").expect(
        "valid type pattern"
    )
});

static PACKAGE_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*package\s+([A-Za-z_][\w.]*)\s*;").expect("valid package pattern")
});

static METHOD_SIGNATURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(public|private|protected)\b.*\(.*\)").expect("valid method pattern")
});

static EXTENDS_CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:<[^{]*?>\s*)?extends\s+([A-Za-z_$][\w$.]*)").expect("valid extends pattern")
});

/// A public top-level type declaration found in source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclKind,
    pub name: String,
    /// Byte offset of the `public` keyword
    pub start: usize,
    /// Byte offset of the start of the line holding the declaration
    pub line_start: usize,
    pub name_start: usize,
    pub name_end: usize,
}

/// A fenced markdown block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock {
    pub language: String,
    pub body: String,
}

pub fn starts_with_explanation(text: &str) -> bool {
    let trimmed = text.trim_start();
    EXPLANATION_INDICATORS.iter().any(|ind| trimmed.starts_with(ind))
}

pub fn contains_explanation(text: &str) -> bool {
    EXPLANATION_INDICATORS.iter().any(|ind| text.contains(ind))
}

/// Drop lines that open with an explanatory phrase
pub fn strip_explanatory_lines(code: &str) -> String {
    code.lines()
        .filter(|line| !starts_with_explanation(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Loose check for any class/interface/enum declaration
pub fn has_type_declaration(text: &str) -> bool {
    ANY_TYPE_DECL.is_match(text)
}

/// Brace depth for every byte that is code; `None` inside comments and literals.
fn code_depths(content: &str) -> Vec<Option<u32>> {
    let bytes = content.as_bytes();
    let len = bytes.len();
    let mut out = vec![None; len];
    let mut depth: u32 = 0;
    let mut i = 0;

    while i < len {
        let next = bytes.get(i + 1).copied();
        match bytes[i] {
            b'/' if next == Some(b'/') => {
                while i < len && bytes[i] != b'\n' {
                    i += 1;
                }
                continue;
            }
            b'/' if next == Some(b'*') => {
                i += 2;
                while i < len && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i = (i + 2).min(len);
                continue;
            }
            b'"' if bytes[i..].starts_with(b"\"\"\"") => {
                i += 3;
                while i < len && !bytes[i..].starts_with(b"\"\"\"") {
                    i += 1;
                }
                i = (i + 3).min(len);
                continue;
            }
            quote @ (b'"' | b'\'') => {
                i += 1;
                while i < len && bytes[i] != quote && bytes[i] != b'\n' {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                i = (i + 1).min(len);
                continue;
            }
            b'{' => {
                out[i] = Some(depth);
                depth += 1;
            }
            b'}' => {
                depth = depth.saturating_sub(1);
                out[i] = Some(depth);
            }
            _ => {
                out[i] = Some(depth);
            }
        }
        i += 1;
    }

    out
}

fn line_start_of(content: &str, offset: usize) -> usize {
    content[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

/// Public declarations at brace depth zero, outside comments and literals, in order
pub fn public_declarations(content: &str) -> Vec<Declaration> {
    let depths = code_depths(content);

    PUBLIC_DECL.captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            if depths.get(whole.start()).copied().flatten() != Some(0) {
                return None;
            }
            let kind = caps.get(1)?;
            let name = caps.get(2)?;
            Some(Declaration {
                kind: DeclKind::from_keyword(kind.as_str()),
                name: name.as_str().to_string(),
                start: whole.start(),
                line_start: line_start_of(content, whole.start()),
                name_start: name.start(),
                name_end: name.end(),
            })
        })
        .collect()
}

/// Rewrite the name in a declaration's `<modifier> <kind> <name>` sequence
pub fn rename_declaration(content: &str, decl: &Declaration, new_name: &str) -> String {
    format!("{}{}{}", &content[..decl.name_start], new_name, &content[decl.name_end..])
}

/// Start of the annotation lines directly above the line at `line_start`
pub fn annotation_block_start(content: &str, line_start: usize) -> usize {
    let mut start = line_start;
    while start > 0 {
        let prev = line_start_of(content, start - 1);
        if !content[prev..start].trim_start().starts_with('@') {
            break;
        }
        start = prev;
    }
    start
}

/// Keep everything before `cut_line_start` and mark the removal
pub fn truncate_at_duplicate(content: &str, cut_line_start: usize) -> String {
    format!("{}\n\n{}\n", content[..cut_line_start].trim_end(), DUPLICATE_MARKER)
}

/// Parent type named by an `extends` clause right after the declaration name
pub fn extends_parent(content: &str, decl: &Declaration) -> Option<String> {
    let header_end = content[decl.name_end..]
        .find('{')
        .map(|i| decl.name_end + i)
        .unwrap_or(content.len());
    let header = &content[decl.name_end..header_end];

    EXTENDS_CLAUSE.captures(header).and_then(|caps| caps.get(1)).map(|m| {
        m.as_str().rsplit('.').next().unwrap_or(m.as_str()).to_string()
    })
}

pub fn extract_package(content: &str) -> Option<String> {
    PACKAGE_DECL.captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Replace the name in the first package clause; text without one is returned unchanged
pub fn replace_package(content: &str, new_package: &str) -> String {
    match PACKAGE_DECL.captures(content).and_then(|caps| caps.get(1)) {
        Some(m) => format!("{}{}{}", &content[..m.start()], new_package, &content[m.end()..]),
        None => content.to_string(),
    }
}

fn path_segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().to_string()),
            _ => None,
        })
        .collect()
}

/// Index of the root-marker segment, preferring one that follows `main` or `test`
fn root_marker_index(segments: &[String]) -> Option<usize> {
    let dirs = segments.len().saturating_sub(1);
    let mut first = None;
    for i in 0..dirs {
        if segments[i] != ROOT_MARKER {
            continue;
        }
        if i > 0 && (segments[i - 1] == "main" || segments[i - 1] == "test") {
            return Some(i);
        }
        first.get_or_insert(i);
    }
    first
}

/// Package implied by the directories between the root marker and the file name
pub fn package_from_path(path: &Path) -> Option<String> {
    let segments = path_segments(path);
    let marker = root_marker_index(&segments)?;
    let package_dirs = &segments[marker + 1..segments.len() - 1];
    if package_dirs.is_empty() {
        return None;
    }
    Some(package_dirs.join("."))
}

/// Which Java source root (`src/main/java` or `src/test/java`) a path sits in
pub fn root_tree_of(path: &Path) -> Option<RootTree> {
    let segments = path_segments(path);
    let marker = root_marker_index(&segments)?;
    match segments.get(marker.checked_sub(1)?).map(String::as_str) {
        Some("main") => Some(RootTree::Main),
        Some("test") => Some(RootTree::Test),
        _ => None,
    }
}

/// The same path with its `main` source root swapped for `test`
pub fn reroute_to_test_tree(path: &Path) -> Option<PathBuf> {
    if root_tree_of(path) != Some(RootTree::Main) {
        return None;
    }

    let components: Vec<Component> = path.components().collect();
    let normal_positions: Vec<usize> = components
        .iter()
        .enumerate()
        .filter(|(_, c)| matches!(c, Component::Normal(_)))
        .map(|(i, _)| i)
        .collect();
    let segments = path_segments(path);
    let marker = root_marker_index(&segments)?;
    let main_position = normal_positions[marker - 1];

    let mut rerouted = PathBuf::new();
    for (i, component) in components.iter().enumerate() {
        if i == main_position {
            rerouted.push("test");
        } else {
            rerouted.push(component.as_os_str());
        }
    }
    Some(rerouted)
}

/// Name conventions that mark a source file as a test
pub fn is_test_file_name(file_name: &str) -> bool {
    let stem = file_name.split('.').next().unwrap_or(file_name);
    stem.contains("Test") || stem.starts_with("test") || stem.ends_with("test") || stem.ends_with("IT")
}

/// First fenced block that carries a body on its own lines
pub fn extract_first_fence(text: &str) -> Option<FencedBlock> {
    let parts: Vec<&str> = text.split("```").collect();

    parts
        .iter()
        .skip(1)
        .step_by(2)
        .find(|block| !block.trim().is_empty() && block.contains('\n'))
        .map(|block| {
            let newline = block.find('\n').unwrap_or(block.len());
            FencedBlock {
                language: block[..newline].trim().to_string(),
                body: block[newline..].trim().to_string(),
            }
        })
}

fn looks_like_type_line(line: &str) -> bool {
    line.contains("class ") || line.contains("interface ") || line.contains("enum ")
}

/// Package clause, imports, the first type declaration with 20 lines of context and
/// up to 15 method signatures.
pub fn condense_java(code: &str) -> String {
    let lines: Vec<&str> = code.lines().collect();
    let mut package_section = Vec::new();
    let mut import_section = Vec::new();
    let mut type_section = Vec::new();

    for (index, line) in lines.iter().take(500).enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with("package ") {
            package_section.push(*line);
        } else if trimmed.starts_with("import ") {
            import_section.push(*line);
        } else if looks_like_type_line(line) {
            let end = (index + 20).min(lines.len());
            type_section.extend_from_slice(&lines[index..end]);
            break;
        }
    }

    let signatures: Vec<&str> = lines
        .iter()
        .filter(|line| METHOD_SIGNATURE.is_match(line) && line.contains('{'))
        .map(|line| line.trim())
        .take(15)
        .collect();

    format!(
        "// --- Package and imports ---\n{}\n{}\n\n\
         // --- Class definition ---\n{}\n\n\
         // --- Method signatures ---\n/*\n{}\n*/\n\n\
         // Note: Code has been truncated due to length constraints",
        package_section.join("\n"),
        import_section.join("\n"),
        type_section.join("\n"),
        signatures.join("\n")
    )
}

fn floor_char_boundary(text: &str, max: usize) -> usize {
    if max >= text.len() {
        return text.len();
    }
    let mut idx = max;
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Cut text to `max_len` bytes (on a char boundary) and append a truncation marker
pub fn truncate_with_marker(text: &str, max_len: usize, marker: &str) -> String {
    if text.len() <= max_len {
        return text.to_string();
    }
    format!("{}{}", &text[..floor_char_boundary(text, max_len)], marker)
}

pub fn truncate_text(text: &str, max_len: usize) -> String {
    truncate_with_marker(text, max_len, "...\n[Output truncated due to length]")
}

/// Shorten a source file while keeping package, imports and the type header
pub fn truncate_java_file(content: &str, max_len: usize) -> String {
    if content.len() <= max_len {
        return content.to_string();
    }

    let lines: Vec<&str> = content.lines().collect();
    let header: Vec<&str> = lines
        .iter()
        .take(200)
        .filter(|line| {
            let trimmed = line.trim();
            trimmed.starts_with("package ") || trimmed.starts_with("import ")
        })
        .copied()
        .collect();

    match lines.iter().position(|line| looks_like_type_line(line)) {
        Some(index) => {
            let start = index.saturating_sub(5);
            let end = (index + 20).min(lines.len());
            format!(
                "{}\n\n{}\n\n// ... file truncated ...",
                header.join("\n"),
                lines[start..end].join("\n")
            )
        }
        None => truncate_with_marker(content, max_len, "...\n[Content truncated]"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_only_top_level_public_declarations() {
        let src = "package a;\n\
                   // public class InComment {}\n\
                   public class Outer {\n\
                       public static class Inner {}\n\
                       String s = \"public class InString {\";\n\
                   }\n";
        let decls = public_declarations(src);
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "Outer");
        assert_eq!(decls[0].kind, DeclKind::Class);
    }

    #[test]
    fn detects_second_top_level_declaration() {
        let src = "public interface A {}\npublic final class B {}\n";
        let decls = public_declarations(src);
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[1].kind, DeclKind::Class);
        assert_eq!(&src[decls[1].line_start..decls[1].line_start + 6], "public");
    }

    #[test]
    fn renames_only_the_declaration_token() {
        let src = "public class Wrong {\n    public Wrong() {}\n}";
        let decl = &public_declarations(src)[0];
        let renamed = rename_declaration(src, decl, "Member");
        assert!(renamed.starts_with("public class Member {"));
        assert!(renamed.contains("public Wrong()"));
    }

    #[test]
    fn package_extraction_and_replacement() {
        let src = "// header\npackage com.acme.old;\n\npublic interface FooRepo {}";
        assert_eq!(extract_package(src).as_deref(), Some("com.acme.old"));
        let fixed = replace_package(src, "com.acme.data");
        assert!(fixed.contains("package com.acme.data;"));
        assert!(!fixed.contains("com.acme.old"));
        assert_eq!(replace_package("public class X {}", "a.b"), "public class X {}");
    }

    #[test]
    fn package_from_path_uses_segments_after_root_marker() {
        let path = Path::new("/work/out/src/main/java/com/acme/data/FooRepo.java");
        assert_eq!(package_from_path(path).as_deref(), Some("com.acme.data"));
        assert_eq!(package_from_path(Path::new("src/main/java/Foo.java")), None);
        assert_eq!(package_from_path(Path::new("legacy/Foo.java")), None);
    }

    #[test]
    fn root_marker_after_main_wins_over_earlier_java_dir() {
        let path = Path::new("/home/java/proj/src/test/java/org/x/FooTest.java");
        assert_eq!(package_from_path(path).as_deref(), Some("org.x"));
        assert_eq!(root_tree_of(path), Some(RootTree::Test));
    }

    #[test]
    fn reroutes_main_paths_to_test_tree() {
        let path = Path::new("/t/src/main/java/org/x/MemberTest.java");
        assert_eq!(
            reroute_to_test_tree(path),
            Some(PathBuf::from("/t/src/test/java/org/x/MemberTest.java"))
        );
        assert_eq!(reroute_to_test_tree(Path::new("/t/src/test/java/org/x/A.java")), None);
    }

    #[test]
    fn test_file_name_conventions() {
        assert!(is_test_file_name("MemberServiceTest.java"));
        assert!(is_test_file_name("testHelpers.java"));
        assert!(is_test_file_name("MemberApiEndToEndIT.java"));
        assert!(!is_test_file_name("Member.java"));
        assert!(!is_test_file_name("MemberRepository.java"));
    }

    #[test]
    fn extracts_first_fenced_block_with_language() {
        let reply = "Sure:\n```java\npublic class A {}\n```\ntrailing";
        let block = extract_first_fence(reply).unwrap();
        assert_eq!(block.language, "java");
        assert_eq!(block.body, "public class A {}");
        assert_eq!(extract_first_fence("no fences here"), None);
    }

    #[test]
    fn explanation_prefix_detection() {
        assert!(starts_with_explanation("  I cannot provide this without seeing more context."));
        assert!(!starts_with_explanation("package a;\n// This code is fine"));
        assert_eq!(
            strip_explanatory_lines("Here is the code\npublic class A {}"),
            "public class A {}"
        );
    }

    #[test]
    fn extends_parent_reads_declaration_header() {
        let src = "public interface MemberRepository extends JpaRepository<Member, Long> {}";
        let decl = &public_declarations(src)[0];
        assert_eq!(extends_parent(src, decl).as_deref(), Some("JpaRepository"));

        let plain = "public interface Plain { void run(); }";
        let decl = &public_declarations(plain)[0];
        assert_eq!(extends_parent(plain, decl), None);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = "ééééé";
        let cut = truncate_text(text, 3);
        assert!(cut.starts_with("é"));
        assert!(cut.ends_with("[Output truncated due to length]"));
        assert_eq!(truncate_text("short", 10), "short");
    }

    #[test]
    fn condensed_java_keeps_skeleton() {
        let mut code = String::from("package a.b;\nimport java.util.List;\n\npublic class Big {\n");
        for i in 0..40 {
            code.push_str(&format!("    public void m{}(int x) {{ }}\n", i));
        }
        code.push_str("}\n");
        let condensed = condense_java(&code);
        assert!(condensed.contains("package a.b;"));
        assert!(condensed.contains("import java.util.List;"));
        assert!(condensed.contains("public class Big {"));
        assert!(condensed.contains("public void m14(int x)"));
        assert!(!condensed.contains("public void m39(int x)"));
    }
}
