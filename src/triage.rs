//! One triage sweep over a repository's open accessibility issues.
//!
//! A sweep runs in two phases. The decision phase resolves configuration,
//! lists issues and classifies all of them against a single clock reading.
//! The mutation phase then applies each category label independently, with
//! bounded concurrency and per-issue retries, so one failing issue never
//! aborts the rest of the batch.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::classify::{Category, Classifier, Decision};
use crate::config::{ConfigResolver, LabelBinding, ResolvedConfig, Role};
use crate::github::GitHubError;
use crate::tracker::{ContentSource, IssueTracker};

/// Default number of label requests in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// How often and how patiently a label request is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per issue, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles for each further retry.
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Returns the delay after failed attempt number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.initial_backoff.saturating_mul(1 << exponent)
    }
}

/// Knobs for a sweep.
#[derive(Debug, Clone)]
pub struct SweepOptions {
    /// Maximum label requests in flight.
    pub concurrency: usize,
    /// Retry behaviour for label requests.
    pub retry: RetryPolicy,
    /// Classify without applying any label.
    pub dry_run: bool,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            retry: RetryPolicy::default(),
            dry_run: false,
        }
    }
}

/// A label that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelFailure {
    /// Issue number.
    pub issue: u64,
    /// Category that should have been applied.
    pub category: Category,
    /// Attempts made before giving up.
    pub attempts: u32,
    /// Last error seen.
    pub error: String,
}

/// Result of a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriageReport {
    /// Configuration that gated the sweep.
    pub config: ResolvedConfig,
    /// Number of open issues examined.
    pub examined: usize,
    /// Every classification decision, in listing order.
    pub decisions: Vec<Decision>,
    /// Decisions whose label was applied.
    pub applied: Vec<Decision>,
    /// Decisions whose label could not be applied.
    pub failed: Vec<LabelFailure>,
    /// Whether labels were deliberately left untouched.
    pub dry_run: bool,
}

impl TriageReport {
    fn disabled(config: ResolvedConfig) -> Self {
        Self {
            config,
            examined: 0,
            decisions: Vec::new(),
            applied: Vec::new(),
            failed: Vec::new(),
            dry_run: false,
        }
    }

    /// Returns the issue numbers whose label could not be applied.
    pub fn failed_issues(&self) -> Vec<u64> {
        self.failed.iter().map(|failure| failure.issue).collect()
    }

    /// Renders a human-readable summary.
    pub fn render(&self) -> String {
        if !self.config.enabled {
            return match &self.config.source {
                Some(path) => format!("Triage is disabled by {path}"),
                None => "No triage configuration found; triage is disabled".to_string(),
            };
        }

        let mut out = format!(
            "Examined {} open issue(s); {} to escalate",
            self.examined,
            self.decisions.len()
        );
        for decision in &self.decisions {
            let status = if self.dry_run {
                "dry run".to_string()
            } else if let Some(failure) = self.failed.iter().find(|f| f.issue == decision.issue) {
                format!(
                    "failed after {} attempt(s): {}",
                    failure.attempts, failure.error
                )
            } else {
                "applied".to_string()
            };
            out.push_str(&format!(
                "\n  #{} -> {} ({status})",
                decision.issue, decision.category
            ));
        }
        out
    }
}

/// Runs sweeps with a fixed label binding and configuration resolver.
#[derive(Debug, Clone)]
pub struct Triage {
    resolver: ConfigResolver,
    binding: LabelBinding,
    options: SweepOptions,
}

impl Triage {
    /// Creates a sweep runner.
    pub fn new(resolver: ConfigResolver, binding: LabelBinding, options: SweepOptions) -> Self {
        Self {
            resolver,
            binding,
            options,
        }
    }

    /// Runs one sweep, measuring every issue's age against `now`.
    ///
    /// A malformed configuration file aborts before any issue is listed.
    /// Label failures are reported, not returned as errors.
    pub async fn run<T>(&self, tracker: &T, now: DateTime<Utc>) -> Result<TriageReport>
    where
        T: ContentSource + IssueTracker,
    {
        let config = self
            .resolver
            .resolve(tracker)
            .await
            .context("Failed to resolve triage configuration")?;

        if !config.enabled {
            info!(source = ?config.source, "Triage disabled; nothing to do");
            return Ok(TriageReport::disabled(config));
        }

        let scope_label = self.binding.label(Role::A11y);
        let issues = tracker
            .list_open_issues(scope_label)
            .await
            .with_context(|| format!("Failed to list open issues labelled '{scope_label}'"))?;

        let classifier = Classifier::new(self.binding.clone(), now);
        let decisions = classifier.classify_batch(&issues);
        info!(
            examined = issues.len(),
            escalations = decisions.len(),
            "Classified open issues"
        );

        let (applied, failed) = if self.options.dry_run {
            (Vec::new(), Vec::new())
        } else {
            self.apply(tracker, &decisions).await
        };

        Ok(TriageReport {
            config,
            examined: issues.len(),
            decisions,
            applied,
            failed,
            dry_run: self.options.dry_run,
        })
    }

    /// Applies every decision's category label.
    ///
    /// Returns the applied decisions and the failures, each in input order.
    pub async fn apply<T>(
        &self,
        tracker: &T,
        decisions: &[Decision],
    ) -> (Vec<Decision>, Vec<LabelFailure>)
    where
        T: IssueTracker,
    {
        let semaphore = Semaphore::new(self.options.concurrency.max(1));
        let retry = self.options.retry;

        let futs = decisions.iter().map(|decision| {
            let semaphore = &semaphore;
            async move {
                let _permit = semaphore.acquire().await.map_err(|e| LabelFailure {
                    issue: decision.issue,
                    category: decision.category,
                    attempts: 0,
                    error: format!("semaphore closed: {e}"),
                })?;
                apply_with_retry(tracker, *decision, retry).await
            }
        });

        let results = futures::future::join_all(futs).await;

        let mut applied = Vec::new();
        let mut failed = Vec::new();
        for (result, decision) in results.into_iter().zip(decisions) {
            match result {
                Ok(()) => applied.push(*decision),
                Err(failure) => failed.push(failure),
            }
        }
        (applied, failed)
    }
}

async fn apply_with_retry<T>(
    tracker: &T,
    decision: Decision,
    retry: RetryPolicy,
) -> Result<(), LabelFailure>
where
    T: IssueTracker,
{
    let labels = vec![decision.category.label().to_string()];
    let max_attempts = retry.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match tracker.add_labels(decision.issue, &labels).await {
            Ok(()) => {
                info!(
                    issue = decision.issue,
                    category = %decision.category,
                    attempt,
                    "Applied category label"
                );
                return Ok(());
            }
            Err(e) if attempt < max_attempts && is_retryable(&e) => {
                let delay = retry.backoff(attempt);
                warn!(
                    issue = decision.issue,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %format!("{e:#}"),
                    "Label request failed; retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                warn!(
                    issue = decision.issue,
                    attempt,
                    error = %format!("{e:#}"),
                    "Label request failed; giving up"
                );
                return Err(LabelFailure {
                    issue: decision.issue,
                    category: decision.category,
                    attempts: attempt,
                    error: format!("{e:#}"),
                });
            }
        }
    }
}

/// Errors other than a permanent GitHub rejection are worth another attempt.
fn is_retryable(error: &anyhow::Error) -> bool {
    !matches!(
        error.downcast_ref::<GitHubError>(),
        Some(github_error) if !github_error.is_retryable()
    )
}
