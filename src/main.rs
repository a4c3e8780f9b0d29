use anyhow::{ Context, Result };
use clap::Parser;
use log::info;

use springport::MigrationConfig;

mod cli;
use cli::{ Commands, SpringportCli };

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Parse the command line arguments
    let cli = SpringportCli::parse();

    // Setup logging
    setup_logging(&cli.log_level);

    let config = MigrationConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    println!("Springport - JBoss EAP to Spring Boot migration");

    let outcome = match &cli.command {
        Commands::Migrate { src, target, model, non_interactive } => {
            cli::commands::migrate::execute(&config, src, target, model.as_deref(), *non_interactive).await
        }
        Commands::Normalize { target } => cli::commands::normalize::execute(&config, target).await,
        Commands::Check { file, kind } => cli::commands::check::execute(file, kind).await,
    };

    if let Err(e) = &outcome {
        cli::ui::print_error(&format!("{:#}", e));
    }
    outcome
}

fn setup_logging(log_level: &str) {
    // Set up the logger based on the log level
    let level = match log_level.to_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };

    env_logger::Builder::new().filter_level(level).init();

    info!("Logger initialized with level: {}", log_level);
}
