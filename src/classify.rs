//! Classification engine.
//!
//! Maps an issue's labels and age to at most one escalation [`Category`].
//! Classification is a pure function of the issue, the [`LabelBinding`] and
//! the instant captured when the [`Classifier`] was built.

pub mod rules;

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{LabelBinding, Role};
use rules::Rule;

/// An open issue as seen by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number, unique within the repository.
    pub id: u64,
    /// When the issue was opened.
    pub created_at: DateTime<Utc>,
    /// Label names currently on the issue.
    #[serde(default)]
    pub labels: BTreeSet<String>,
}

impl Issue {
    /// Returns true if the issue carries the label `name`.
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.contains(name)
    }
}

/// Escalation tier, from `CAT0` (most urgent) to `CAT4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// High-severity defect in a release cycle.
    #[serde(rename = "CAT0")]
    Cat0,
    /// Production blocker past its grace period.
    #[serde(rename = "CAT1")]
    Cat1,
    /// Production critical, or release moderate, past its grace period.
    #[serde(rename = "CAT2")]
    Cat2,
    /// Production serious past its grace period.
    #[serde(rename = "CAT3")]
    Cat3,
    /// Production moderate past its grace period.
    #[serde(rename = "CAT4")]
    Cat4,
}

impl Category {
    /// Returns the label applied to issues in this category.
    pub fn label(self) -> &'static str {
        match self {
            Self::Cat0 => "CAT0",
            Self::Cat1 => "CAT1",
            Self::Cat2 => "CAT2",
            Self::Cat3 => "CAT3",
            Self::Cat4 => "CAT4",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Defect impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Blocks use of the product.
    Blocker,
    /// Severe impact.
    Critical,
    /// Significant impact.
    Serious,
    /// Noticeable impact.
    Moderate,
}

impl Severity {
    /// Returns the label role naming this severity.
    pub fn role(self) -> Role {
        match self {
            Self::Blocker => Role::Blocker,
            Self::Critical => Role::Critical,
            Self::Serious => Role::Serious,
            Self::Moderate => Role::Moderate,
        }
    }
}

/// Where in the lifecycle the defect was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Found after shipping.
    Production,
    /// Found during a release cycle.
    Released,
}

impl Stage {
    /// Returns the label role naming this stage.
    pub fn role(self) -> Role {
        match self {
            Self::Production => Role::Production,
            Self::Released => Role::Released,
        }
    }
}

/// The outcome of classifying one issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Decision {
    /// Issue number.
    pub issue: u64,
    /// Category to apply.
    pub category: Category,
}

/// Applies the rule tables to issues using a fixed clock reading.
#[derive(Debug, Clone)]
pub struct Classifier {
    binding: LabelBinding,
    now: DateTime<Utc>,
}

impl Classifier {
    /// Creates a classifier that measures every issue's age against `now`.
    pub fn new(binding: LabelBinding, now: DateTime<Utc>) -> Self {
        Self { binding, now }
    }

    /// Returns the instant ages are measured against.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Returns the label binding in use.
    pub fn binding(&self) -> &LabelBinding {
        &self.binding
    }

    fn has_role(&self, issue: &Issue, role: Role) -> bool {
        issue.has_label(self.binding.label(role))
    }

    /// Returns the lifecycle stage that governs `issue`, if any.
    pub fn stage(&self, issue: &Issue) -> Option<Stage> {
        rules::STAGE_PRECEDENCE
            .into_iter()
            .find(|stage| self.has_role(issue, stage.role()))
    }

    /// Classifies one issue.
    ///
    /// Issues without the accessibility label are out of scope and never
    /// receive a category.
    pub fn classify(&self, issue: &Issue) -> Option<Category> {
        if !self.has_role(issue, Role::A11y) {
            debug!(
                issue = issue.id,
                "Skipping issue without accessibility label"
            );
            return None;
        }

        let stage = self.stage(issue)?;
        let rule = rules::rules_for(stage).iter().find(|rule| {
            rule.severities
                .iter()
                .any(|severity| self.has_role(issue, severity.role()))
        })?;

        self.is_old_enough(issue, rule).then_some(rule.category)
    }

    fn is_old_enough(&self, issue: &Issue, rule: &Rule) -> bool {
        let (Some(weeks), Some(cutoff)) = (rule.min_age_weeks, rule.cutoff(self.now)) else {
            return true;
        };

        debug!(
            issue = issue.id,
            created_at = %issue.created_at,
            threshold_weeks = weeks,
            cutoff = %cutoff,
            "Comparing issue creation date to threshold"
        );
        issue.created_at <= cutoff
    }

    /// Classifies every issue, keeping only those that receive a category.
    ///
    /// Output order follows input order.
    pub fn classify_batch(&self, issues: &[Issue]) -> Vec<Decision> {
        issues
            .iter()
            .filter_map(|issue| {
                self.classify(issue).map(|category| Decision {
                    issue: issue.id,
                    category,
                })
            })
            .collect()
    }
}
