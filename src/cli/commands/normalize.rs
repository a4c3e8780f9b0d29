use std::path::Path;

use anyhow::{ Context, Result };

use springport::{ normalize_tree, LocalFileTree, MigrationConfig, MigrationOptions };

use crate::cli::ui;

/// Execute the normalize command
pub async fn execute(config: &MigrationConfig, target: &Path) -> Result<()> {
    ui::print_header("Normalize Project Structure");

    // Normalization never reads the legacy tree, so the target stands in for it.
    let options = MigrationOptions::new(target, target, config);
    let spinner = ui::spinner_with_message("Checking test placement and package declarations...");
    let report = normalize_tree(&LocalFileTree::new(), &options).context("Normalization failed");
    spinner.finish_and_clear();
    let report = report?;

    if report.is_clean() {
        ui::print_success("Project structure already consistent");
        return Ok(());
    }

    for (from, to) in &report.moved {
        ui::print_result("Moved", &format!("{} -> {}", from.display(), to.display()));
    }
    for path in &report.repackaged {
        ui::print_result("Package fixed", &path.display().to_string());
    }
    ui::print_success(
        &format!("{} file(s) moved, {} package declaration(s) fixed", report.moved.len(), report.repackaged.len())
    );
    Ok(())
}
