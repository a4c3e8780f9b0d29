use colored::*;
use console::Term;
use dialoguer::{ theme::ColorfulTheme, Confirm };
use indicatif::{ ProgressBar, ProgressStyle };
use std::time::Duration;
use textwrap::wrap;

use springport::{ MigrationReport, OperatorPrompt };

/// UI theme for consistent appearance
pub fn get_theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

/// Print a section header
pub fn print_header(title: &str) {
    let title = format!(" {} ", title);
    println!("\n{}\n", title.bold().white().on_blue());
}

/// Print text with proper wrapping; code lines are printed as-is
pub fn print_text(text: &str) {
    let width = Term::stdout().size().1 as usize;
    for line in text.lines() {
        if line.starts_with(char::is_whitespace) || line.ends_with(';') || line.ends_with('{') {
            println!("{}", line);
        } else {
            for wrapped_line in wrap(line, width.saturating_sub(10).max(20)) {
                println!("{}", wrapped_line);
            }
        }
    }
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "ERROR:".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "WARNING:".yellow().bold(), message);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "SUCCESS:".green().bold(), message);
}

/// Print information
pub fn print_info(message: &str) {
    println!("{} {}", "INFO:".blue().bold(), message);
}

/// Print a formatted result
pub fn print_result(label: &str, value: &str) {
    println!("{}: {}", label.bold(), value);
}

/// Per-phase summary of a migration run
pub fn print_report(report: &MigrationReport) {
    print_header("Migration Summary");

    for phase in &report.phases {
        let status = if phase.succeeded { "passed".green().bold() } else { "halted".red().bold() };
        let elapsed = (phase.finished_at - phase.started_at).num_seconds();
        let gate = phase.gate
            .as_ref()
            .map(|g| format!("{} test run(s), {} repair cycle(s)", g.test_runs, g.repair_cycles))
            .unwrap_or_else(|| "not run".to_string());

        println!(
            "{} {} ({} migrated, {} failed; {}; {}s)",
            format!("{}:", phase.phase_id).bold(),
            status,
            phase.migrated_artifacts,
            phase.failed_artifacts,
            gate,
            elapsed
        );
    }

    match report.halted_at() {
        Some(phase) => print_error(&format!("Migration halted at {}", phase)),
        None if report.completed => print_success("All phases completed"),
        None => print_warning("Migration did not run to completion"),
    }
}

/// Confirm an action with the user
pub fn confirm_action(prompt: &str, default: bool) -> std::io::Result<bool> {
    Confirm::with_theme(&get_theme())
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}

/// Display a spinner while waiting for an operation to complete
pub fn spinner_with_message(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Operator prompt backed by the terminal; anything but an explicit yes declines
pub struct ConsoleOperator;

impl OperatorPrompt for ConsoleOperator {
    fn confirm(&self, question: &str) -> bool {
        print_warning(question);
        match confirm_action(question, false) {
            Ok(answer) => answer,
            Err(e) => {
                print_error(&format!("Could not read an answer: {}", e));
                false
            }
        }
    }
}
