//! CLI interface for a11y-triage.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod classify;
pub mod config;
pub mod run;

/// a11y-triage: escalates aging accessibility issues.
#[derive(Parser)]
#[command(name = "a11y-triage")]
#[command(about = "Escalates aging accessibility issues into SLA categories", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Main command categories.
#[derive(Subcommand)]
pub enum Commands {
    /// Triages the open accessibility issues of a GitHub repository.
    Run(run::RunCommand),
    /// Classifies issues from a local YAML or JSON file without touching GitHub.
    Classify(classify::ClassifyCommand),
    /// Configuration inspection.
    Config(config::ConfigCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Run(run_cmd) => run_cmd.execute().await,
            Commands::Classify(classify_cmd) => classify_cmd.execute(),
            Commands::Config(config_cmd) => config_cmd.execute().await,
        }
    }
}
