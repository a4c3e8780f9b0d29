use std::path::Path;
use std::sync::Arc;

use anyhow::{ bail, Context, Result };
use log::info;

use springport::{
    CommandTestRunner,
    FixedAnswer,
    GitManager,
    LlmOracle,
    LocalFileTree,
    MigrationConfig,
    MigrationOptions,
    OperatorPrompt,
    PhaseOrchestrator,
};

use crate::cli::ui;

/// Execute the migrate command
pub async fn execute(
    config: &MigrationConfig,
    src: &Path,
    target: &Path,
    model: Option<&str>,
    non_interactive: bool
) -> Result<()> {
    ui::print_header("JBoss to Spring Boot Migration");

    if !src.is_dir() {
        bail!("Source project {} does not exist or is not a directory", src.display());
    }

    let credentials = config.get_api_key().context("No oracle credentials available")?;
    let oracle = LlmOracle::new(&config.llm_api, credentials, model).context(
        "Failed to create the oracle client"
    )?;

    let options = MigrationOptions::new(src, target, config);
    ui::print_result("Source", &options.source_root.display().to_string());
    ui::print_result("Target", &options.target_root.display().to_string());
    ui::print_result("Base package", &options.base_package);
    ui::print_result("Test attempts per phase", &options.test_attempts.to_string());

    let operator: Arc<dyn OperatorPrompt> = if non_interactive {
        ui::print_info("Non-interactive run: exhausted test budgets halt the migration");
        Arc::new(FixedAnswer(false))
    } else {
        Arc::new(ui::ConsoleOperator)
    };

    let orchestrator = PhaseOrchestrator::new(
        Arc::new(oracle),
        Arc::new(LocalFileTree::new()),
        Arc::new(GitManager::new(target)),
        Arc::new(CommandTestRunner::new(target, config.test_command.clone())),
        operator,
        options
    );

    info!("Starting migration pipeline");
    let report = orchestrator.run().await.context("Migration aborted")?;
    ui::print_report(&report);

    if let Some(phase) = report.halted_at() {
        bail!("Migration halted at {}; earlier phases remain committed", phase);
    }
    Ok(())
}
