use std::path::PathBuf;

use log::{ error, info };

use crate::errors::MigrationResult;
use crate::implementations::migrators::{ MigrationContext, MigratorSummary };
use crate::models::rule::ArtifactRule;

const TEMPLATE_SYSTEM: &str =
    "You are an HTML template generation assistant. Output ONLY the complete HTML code with no additional \
     text, explanations, or markdown formatting.";

/// Glob selecting JSF pages under the legacy source root
pub const JSF_PAGE_GLOB: &str = "**/webapp/*.xhtml";

/// JSF pages become Thymeleaf templates; JSF controllers become Spring MVC controllers
pub async fn migrate_ui_layer(ctx: &MigrationContext<'_>) -> MigrationResult<MigratorSummary> {
    let mut summary = migrate_pages(ctx).await?;
    summary.merge(ctx.migrate_all(ArtifactRule::Controller).await?);
    Ok(summary)
}

async fn migrate_pages(ctx: &MigrationContext<'_>) -> MigrationResult<MigratorSummary> {
    let mut summary = MigratorSummary::default();
    let pages = ctx.sources(JSF_PAGE_GLOB)?;
    info!("Migrating {} JSF page(s)", pages.len());

    for page in pages {
        let content = match ctx.files.read(&page) {
            Ok(content) => content,
            Err(e) => {
                error!("Failed to read {}: {}", page.display(), e);
                summary.failed += 1;
                continue;
            }
        };
        let stem = page
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let relative = PathBuf::from("src/main/resources/templates").join(format!("{}.html", stem));

        let prompt = format!(
            "Convert this JSF page to a Thymeleaf template:\n\n\
             ```xml\n{}\n```\n\n\
             Make these changes:\n\
             1. Replace JSF tags with Thymeleaf attributes\n\
             2. Keep the same page structure and functionality\n\
             3. Use Thymeleaf's syntax for forms, iterations, conditionals, etc.\n\n\
             Only respond with the complete HTML Thymeleaf template, no explanations.",
            content
        );

        match ctx.generate_text_file(&prompt, TEMPLATE_SYSTEM, "html", &relative).await {
            Ok(Some(path)) => {
                info!("Migrated JSF to Thymeleaf: {}", path.display());
                summary.migrated += 1;
            }
            Ok(None) => {
                summary.failed += 1;
            }
            Err(e) => {
                error!("Failed to write template for {}: {}", page.display(), e);
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}
