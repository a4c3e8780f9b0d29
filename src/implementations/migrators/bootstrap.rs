use std::path::Path;

use log::{ error, info };

use crate::errors::MigrationResult;
use crate::implementations::migrators::{ ArtifactPrompts, MigrationContext, MigratorSummary };
use crate::implementations::resolver;
use crate::models::artifact::TargetLocation;
use crate::models::common::RootTree;
use crate::models::rule::ArtifactRule;

const XML_SYSTEM: &str =
    "You are a code generation assistant. Output ONLY the complete XML code with no additional text, \
     explanations, or markdown formatting.";

const PROPERTIES_SYSTEM: &str =
    "You are a configuration file generation assistant. Output ONLY the complete properties file content \
     with no additional text, explanations, or markdown formatting.";

/// pom.xml, application.properties and the Spring Boot application class
pub async fn setup_project(ctx: &MigrationContext<'_>) -> MigrationResult<MigratorSummary> {
    let options = ctx.options;
    let mut summary = MigratorSummary::default();

    let pom_prompt = format!(
        "Create a pom.xml file for a Spring Boot application that is migrated from a JBoss EAP application.\n\
         The application should include:\n\
         - Spring Boot Starter Web\n\
         - Spring Boot Starter Data JPA\n\
         - Spring Boot Starter Validation\n\
         - Spring Boot Starter Test\n\
         - H2 Database for testing\n\
         - PostgreSQL driver for production\n\
         - Thymeleaf for templates\n\
         The Java version should be 17.\n\
         The group ID should be {} and the artifact ID should be {}-spring.",
        options.group_id,
        options.artifact_id
    );
    record_text(&mut summary, ctx.generate_text_file(&pom_prompt, XML_SYSTEM, "xml", Path::new("pom.xml")).await?);

    let properties_prompt =
        "Create a Spring Boot application.properties file with:\n\
         - Database configuration (H2 for dev/test, prepared for PostgreSQL in production)\n\
         - JPA/Hibernate settings\n\
         - Logging configuration\n\
         - Server port and context path configuration";
    record_text(
        &mut summary,
        ctx.generate_text_file(
            properties_prompt,
            PROPERTIES_SYSTEM,
            "properties",
            Path::new("src/main/resources/application.properties")
        ).await?
    );

    let application_prompt = format!(
        "Create a Spring Boot main application class named {} in the {} package.",
        options.application_class,
        options.base_package
    );
    summary.merge(
        generate_config_class(
            ctx,
            &application_prompt,
            &options.application_class,
            &options.base_package,
            RootTree::Main
        ).await
    );

    Ok(summary)
}

/// Test database configuration, written into the test tree
pub async fn configure_database(ctx: &MigrationContext<'_>) -> MigrationResult<MigratorSummary> {
    let package = ArtifactRule::Configuration.default_package(&ctx.options.base_package);
    let prompt = format!(
        "Create a Spring Boot test configuration class named TestDatabaseConfig that sets up an H2 in-memory \
         database for testing purposes. The class should be in the {} package.",
        package
    );
    Ok(generate_config_class(ctx, &prompt, "TestDatabaseConfig", &package, RootTree::Test).await)
}

/// Transaction management configuration
pub async fn implement_transaction_management(ctx: &MigrationContext<'_>) -> MigrationResult<MigratorSummary> {
    let package = ArtifactRule::Configuration.default_package(&ctx.options.base_package);
    let prompt = format!(
        "Create a Spring Boot configuration class named TransactionConfig for transaction management. \
         The class should be in the {} package.",
        package
    );
    Ok(generate_config_class(ctx, &prompt, "TransactionConfig", &package, RootTree::Main).await)
}

fn record_text(summary: &mut MigratorSummary, written: Option<std::path::PathBuf>) {
    match written {
        Some(path) => {
            info!("Created {}", path.display());
            summary.migrated += 1;
        }
        None => {
            summary.failed += 1;
        }
    }
}

/// Validated configuration class at a fixed location
async fn generate_config_class(
    ctx: &MigrationContext<'_>,
    prompt: &str,
    class_name: &str,
    package: &str,
    root: RootTree
) -> MigratorSummary {
    let rule = ArtifactRule::Configuration;
    let mut summary = MigratorSummary::default();

    let prompts = ArtifactPrompts {
        initial: prompt.to_string(),
        strict: format!(
            "{}\n\nIMPORTANT: Start with `package {};`, declare exactly one public class named {} \
             and respond with ONLY the complete Java code.",
            prompt,
            package,
            class_name
        ),
    };
    let artifact = ctx.generate_validated(rule, &prompts, class_name, package).await;
    let content = resolver::correct_package(&artifact.content, package).unwrap_or(artifact.content);
    let location = TargetLocation::new(root, package, &format!("{}.java", class_name));

    match ctx.write_with_fallback(rule, &location, &content) {
        Ok(path) => {
            info!("Created {}", path.display());
            summary.migrated += 1;
            if artifact.is_stub {
                summary.stubbed += 1;
            }
        }
        Err(e) => {
            error!("Failed to write {}: {}", class_name, e);
            summary.failed += 1;
        }
    }
    summary
}
