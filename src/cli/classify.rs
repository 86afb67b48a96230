//! Classify command — offline classification of an issue list.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;

use crate::classify::{Classifier, Decision, Issue};
use crate::config::{LabelBinding, LabelParams};
use crate::utils::{check_label_parameters, Settings};

/// Classify command options.
#[derive(Parser)]
pub struct ClassifyCommand {
    /// YAML or JSON file listing issues with `id`, `created_at` and `labels`.
    #[arg(value_name = "ISSUES_FILE")]
    pub issues_file: PathBuf,

    /// Instant ages are measured against, in RFC 3339 (defaults to now).
    #[arg(long, value_name = "TIMESTAMP")]
    pub now: Option<DateTime<Utc>>,

    /// Label names for each role.
    #[command(flatten)]
    pub labels: LabelParams,
}

impl ClassifyCommand {
    /// Executes the classify command.
    pub fn execute(self) -> Result<()> {
        let settings = Settings::load().context("Failed to load settings")?;
        let binding = check_label_parameters(&self.labels, &settings)?;
        let now = self.now.unwrap_or_else(Utc::now);

        let decisions = classify_file(&self.issues_file, binding, now)?;
        let yaml = serde_yaml::to_string(&decisions).context("Failed to serialize decisions")?;
        print!("{yaml}");
        Ok(())
    }
}

/// Reads issues from `path` and classifies them against `now`.
pub fn classify_file(
    path: &Path,
    binding: LabelBinding,
    now: DateTime<Utc>,
) -> Result<Vec<Decision>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read issues file: {}", path.display()))?;

    // JSON is valid YAML, so one parser covers both.
    let issues: Vec<Issue> = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse issues file: {}", path.display()))?;

    Ok(Classifier::new(binding, now).classify_batch(&issues))
}
