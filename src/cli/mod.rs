use clap::{ Parser, Subcommand };
use std::path::PathBuf;

pub mod commands;
pub mod ui;

#[derive(Parser)]
#[command(
    name = "springport",
    about = "Staged, test-gated migration of JBoss EAP applications to Spring Boot",
    version,
    author,
    long_about = None
)]
pub struct SpringportCli {
    /// Sets the log level (error, warn, info, debug, trace)
    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the five-phase migration pipeline
    Migrate {
        /// Root of the legacy JBoss project
        #[arg(short, long)]
        src: PathBuf,

        /// Directory for the Spring Boot project
        #[arg(short, long)]
        target: PathBuf,

        /// Model to use instead of the configured one
        #[arg(short, long)]
        model: Option<String>,

        /// Never prompt; halt when the test budget is exhausted
        #[arg(long, default_value = "false")]
        non_interactive: bool,
    },

    /// Move misplaced tests and fix package declarations in a target tree
    Normalize {
        /// Directory of the Spring Boot project
        #[arg(short, long)]
        target: PathBuf,
    },

    /// Check one generated Java file against an artifact rule
    Check {
        /// Java file to check
        #[arg(short, long)]
        file: PathBuf,

        /// Artifact kind (entity, repository, service, rest, controller, config)
        #[arg(short, long)]
        kind: String,
    },
}
