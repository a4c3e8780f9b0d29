use std::path::{ Path, PathBuf };

use log::{ error, info, warn };

use crate::errors::MigrationResult;
use crate::implementations::migrators::{ MigrationContext, MigratorSummary };
use crate::implementations::{ resolver, validator };
use crate::models::artifact::TargetLocation;
use crate::models::common::RootTree;
use crate::models::conversation::ExpectedOutput;
use crate::models::rule::ArtifactRule;

/// Rules whose migrated artifacts get validation hardening
pub const HARDENED_RULES: [ArtifactRule; 2] = [ArtifactRule::Entity, ArtifactRule::Controller];

/// Strengthen bean validation in every migrated entity and controller.
///
/// A file is only overwritten with a reply that passes the validator.
pub async fn harden_validation(ctx: &MigrationContext<'_>) -> MigrationResult<MigratorSummary> {
    let mut summary = MigratorSummary::default();

    for rule in HARDENED_RULES {
        for source in ctx.sources(rule.source_glob())? {
            match harden_file(ctx, rule, &source).await {
                Ok(true) => {
                    summary.migrated += 1;
                }
                Ok(false) => {}
                Err(e) => {
                    error!("Error enhancing validation for {}: {}", source.display(), e);
                    summary.failed += 1;
                }
            }
        }
    }

    Ok(summary)
}

/// Returns whether the migrated file was rewritten
async fn harden_file(ctx: &MigrationContext<'_>, rule: ArtifactRule, source: &Path) -> MigrationResult<bool> {
    let file_name = source
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let type_name = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let Some(target) = locate_migrated(ctx, rule, source, &file_name)? else {
        warn!("Could not find migrated {} {}; skipping validation enhancements", rule.label(), file_name);
        return Ok(false);
    };

    let migrated = ctx.files.read(&target)?;
    let Some(prompt) = rule.hardening_prompt(&migrated) else {
        return Ok(false);
    };

    let Some(reply) = ctx.gateway.query(&prompt, &rule.system_instructions(), &ExpectedOutput::java()).await else {
        warn!("No usable reply while hardening {}; keeping the migrated version", file_name);
        return Ok(false);
    };
    let Some(updated) = validator::validate(&type_name, &reply, rule.accepted_kinds()) else {
        warn!("Hardened {} failed validation; keeping the migrated version", file_name);
        return Ok(false);
    };

    ctx.files.write(&target, &updated)?;
    info!("Enhanced validation for {}: {}", rule.label(), target.display());
    Ok(true)
}

/// Resolved location first, then the rule's default package location
fn locate_migrated(
    ctx: &MigrationContext<'_>,
    rule: ArtifactRule,
    source: &Path,
    file_name: &str
) -> MigrationResult<Option<PathBuf>> {
    let default_package = rule.default_package(&ctx.options.base_package);
    let legacy = ctx.files.read(source)?;
    let package = resolver::resolve_package(source, &legacy, &default_package);

    let candidates = [
        TargetLocation::new(RootTree::Main, &package, file_name),
        TargetLocation::new(RootTree::Main, &default_package, file_name),
    ];
    Ok(
        candidates
            .iter()
            .map(|location| location.resolve(&ctx.options.target_root))
            .find(|path| ctx.files.exists(path))
    )
}
