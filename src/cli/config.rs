//! Configuration-related CLI commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::{ConfigResolver, ResolvedConfig, DEFAULT_CONFIG_STEM};
use crate::tracker::LocalContentSource;

/// Configuration operations.
#[derive(Parser)]
pub struct ConfigCommand {
    /// Configuration subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

/// Configuration subcommands.
#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Resolves the triage configuration of a local checkout.
    Show(ShowCommand),
}

/// Show command options.
#[derive(Parser)]
pub struct ShowCommand {
    /// Repository checkout to read the configuration from.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Configuration file path without its extension.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_STEM)]
    pub config_stem: String,
}

impl ConfigCommand {
    /// Executes the config command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            ConfigSubcommands::Show(show_cmd) => show_cmd.execute().await,
        }
    }
}

impl ShowCommand {
    /// Executes the show command.
    pub async fn execute(self) -> Result<()> {
        let resolved = self.resolve().await?;

        let yaml = serde_yaml::to_string(&resolved).context("Failed to serialize configuration")?;
        print!("{yaml}");

        match &resolved.source {
            Some(path) => println!("✓ Resolved from {path}"),
            None => println!(
                "ℹ️  No configuration file found under {}; triage is disabled",
                self.root.display()
            ),
        }
        Ok(())
    }

    async fn resolve(&self) -> Result<ResolvedConfig> {
        let source = LocalContentSource::new(&self.root);
        let resolver = ConfigResolver::new(&self.config_stem);
        Ok(resolver.resolve(&source).await?)
    }
}
