use std::path::Path;

use anyhow::{ anyhow, bail, Result };

use springport::{ validate, ArtifactRule, CodeArtifact, FileTree, LocalFileTree };

use crate::cli::ui;

/// Execute the check command
pub async fn execute(file: &Path, kind: &str) -> Result<()> {
    ui::print_header("Check Generated Artifact");

    let rule = ArtifactRule::from_name(kind).ok_or_else(||
        anyhow!("Unknown artifact kind '{}' (expected entity, repository, service, rest, controller or config)", kind)
    )?;
    let type_name = file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| anyhow!("Cannot derive a type name from {}", file.display()))?;

    let content = LocalFileTree::new().read(file)?;
    ui::print_result("Rule", rule.label());
    ui::print_result("Expected type", type_name);

    let artifact = CodeArtifact::parse(&content);
    ui::print_result(
        "Declared",
        &format!(
            "{} {} in package {}",
            artifact.declared_kind,
            artifact.declared_type_name.as_deref().unwrap_or("<none>"),
            artifact.package_declaration.as_deref().unwrap_or("<none>")
        )
    );

    match validate(type_name, &content, rule.accepted_kinds()) {
        Some(accepted) if accepted == content => {
            ui::print_success("Artifact is valid as written");
            Ok(())
        }
        Some(accepted) => {
            ui::print_warning("Artifact is valid after correction:");
            ui::print_text(&accepted);
            Ok(())
        }
        None => bail!("{} is not an acceptable {}", file.display(), rule.label()),
    }
}
