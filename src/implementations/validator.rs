use log::{ debug, error, info, warn };

use crate::implementations::java_syntax::{ self, Declaration };
use crate::models::common::DeclKind;

/// Advisory comment placed above interfaces that extend a parent
pub fn parent_signature_reminder(parent: &str) -> String {
    format!("// Make sure all method return types match those in {}", parent)
}

/// Structural checks and deterministic repairs for one generated artifact.
///
/// Returns `None` when the content cannot be used: it opens with explanatory
/// prose, or it has no public top-level declaration of an accepted kind.
/// Public declarations above the first accepted one are dropped and any after
/// it are cut off, so one public top-level type remains. Otherwise the (possibly repaired) content is returned; validating that
/// output again yields it unchanged.
pub fn validate(expected_base_name: &str, content: &str, accepted: &[DeclKind]) -> Option<String> {
    if java_syntax::starts_with_explanation(content) {
        error!("Generated content for {} is explanatory text, not Java code", expected_base_name);
        return None;
    }

    if java_syntax::extract_package(content).is_none() {
        warn!("No package declaration found in {}", expected_base_name);
    }

    let declarations = java_syntax::public_declarations(content);
    let Some(primary_index) = declarations.iter().position(|d| accepted.contains(&d.kind)) else {
        error!(
            "No valid {} declaration found in {}",
            accepted
                .iter()
                .map(|k| k.keyword())
                .collect::<Vec<_>>()
                .join("/"),
            expected_base_name
        );
        return None;
    };

    if primary_index > 0 {
        let primary = &declarations[primary_index];
        warn!(
            "Dropping {} public declaration(s) above {} {} in {}",
            primary_index,
            primary.kind,
            primary.name,
            expected_base_name
        );
        let from = java_syntax::annotation_block_start(content, declarations[0].line_start);
        let to = java_syntax::annotation_block_start(content, primary.line_start);
        let stripped = format!("{}{}", &content[..from], &content[to..]);
        return validate(expected_base_name, &stripped, accepted);
    }

    let primary = declarations[primary_index].clone();
    let mut content = match declarations.get(primary_index + 1) {
        Some(extra) => {
            warn!(
                "Found multiple top-level declarations in {}; keeping only {} {}",
                expected_base_name,
                primary.kind,
                primary.name
            );
            let cut = java_syntax::annotation_block_start(content, extra.line_start);
            java_syntax::truncate_at_duplicate(content, cut)
        }
        None => content.to_string(),
    };

    if primary.name != expected_base_name {
        warn!(
            "Renamed {} from {} to {} to match file name",
            primary.kind,
            primary.name,
            expected_base_name
        );
        content = java_syntax::rename_declaration(&content, &primary, expected_base_name);
    }

    if primary.kind == DeclKind::Interface {
        content = remind_parent_signatures(&content);
    }

    debug!("Validated {} ({} characters)", expected_base_name, content.len());
    Some(content)
}

/// Inject the parent-signature reminder above an interface with an `extends` clause
fn remind_parent_signatures(content: &str) -> String {
    let Some(decl) = java_syntax::public_declarations(content)
        .into_iter()
        .find(|d| d.kind == DeclKind::Interface) else {
        return content.to_string();
    };
    let Some(parent) = java_syntax::extends_parent(content, &decl) else {
        return content.to_string();
    };

    let reminder = parent_signature_reminder(&parent);
    if content.contains(&reminder) {
        return content.to_string();
    }

    info!("Adding parent signature reminder for {} extends {}", decl.name, parent);
    insert_line_before(content, &decl, &reminder)
}

fn insert_line_before(content: &str, decl: &Declaration, line: &str) -> String {
    format!("{}{}\n{}", &content[..decl.line_start], line, &content[decl.line_start..])
}
