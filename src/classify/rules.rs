//! Escalation rule tables.
//!
//! Each lifecycle stage owns an ordered table. The first rule whose
//! severity labels are present on an issue is selected, and its age gate
//! alone decides whether the issue escalates. Thresholds only grow down
//! each table, so a selected rule that fails its gate could never be
//! rescued by a lower one.

use chrono::{DateTime, Duration, Utc};

use super::{Category, Severity, Stage};

/// One row of a stage's rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    /// The rule applies when any of these severities is present.
    pub severities: &'static [Severity],
    /// Minimum age in weeks, inclusive. `None` applies at any age.
    pub min_age_weeks: Option<u32>,
    /// Category assigned when the rule applies.
    pub category: Category,
}

/// Stages in the order they are checked; the first one present wins.
pub const STAGE_PRECEDENCE: [Stage; 2] = [Stage::Production, Stage::Released];

/// Defects that escaped into production.
pub const PRODUCTION_RULES: &[Rule] = &[
    Rule {
        severities: &[Severity::Blocker],
        min_age_weeks: Some(4),
        category: Category::Cat1,
    },
    Rule {
        severities: &[Severity::Critical],
        min_age_weeks: Some(10),
        category: Category::Cat2,
    },
    Rule {
        severities: &[Severity::Serious],
        min_age_weeks: Some(20),
        category: Category::Cat3,
    },
    Rule {
        severities: &[Severity::Moderate],
        min_age_weeks: Some(30),
        category: Category::Cat4,
    },
];

/// Defects raised against a release in progress.
///
/// High severities escalate immediately, with no age gate.
pub const RELEASED_RULES: &[Rule] = &[
    Rule {
        severities: &[Severity::Blocker, Severity::Critical, Severity::Serious],
        min_age_weeks: None,
        category: Category::Cat0,
    },
    Rule {
        severities: &[Severity::Moderate],
        min_age_weeks: Some(10),
        category: Category::Cat2,
    },
];

/// Returns the rule table for `stage`.
pub fn rules_for(stage: Stage) -> &'static [Rule] {
    match stage {
        Stage::Production => PRODUCTION_RULES,
        Stage::Released => RELEASED_RULES,
    }
}

impl Rule {
    /// Returns the creation cutoff: issues created at or before it are old enough.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.min_age_weeks
            .map(|weeks| now - Duration::weeks(i64::from(weeks)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn is_non_decreasing(rules: &[Rule]) -> bool {
        rules
            .windows(2)
            .all(|pair| pair[0].min_age_weeks.unwrap_or(0) <= pair[1].min_age_weeks.unwrap_or(0))
    }

    #[test]
    fn thresholds_grow_down_each_table() {
        for stage in STAGE_PRECEDENCE {
            assert!(is_non_decreasing(rules_for(stage)), "{stage:?}");
        }
    }

    #[test]
    fn production_gates_every_severity() {
        assert!(PRODUCTION_RULES.iter().all(|r| r.min_age_weeks.is_some()));
    }

    #[test]
    fn released_high_severity_has_no_gate() {
        assert_eq!(RELEASED_RULES[0].min_age_weeks, None);
        assert_eq!(RELEASED_RULES[0].category, Category::Cat0);
    }

    #[test]
    fn cutoff_is_whole_weeks_before_now() {
        let now = DateTime::parse_from_rfc3339("2024-03-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let cutoff = PRODUCTION_RULES[0].cutoff(now);
        assert_eq!(cutoff, Some(now - Duration::seconds(4 * 7 * 24 * 60 * 60)));
    }
}
