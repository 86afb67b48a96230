//! Semantic label roles and their concrete label names.

use std::fmt;

use clap::Args;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::utils::settings::Settings;

/// A fixed semantic role that some concrete label name plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// Marks an issue as in scope for accessibility triage.
    A11y,
    /// Highest severity.
    Blocker,
    /// Second severity tier.
    Critical,
    /// Third severity tier.
    Serious,
    /// Lowest tracked severity.
    Moderate,
    /// Defect found after release.
    Production,
    /// Defect found during a release cycle.
    Released,
}

impl Role {
    /// All roles, in the order parameters are validated.
    pub const ALL: [Self; 7] = [
        Self::A11y,
        Self::Blocker,
        Self::Critical,
        Self::Serious,
        Self::Moderate,
        Self::Production,
        Self::Released,
    ];

    /// Returns the command-line parameter that supplies this role.
    pub fn param_name(self) -> &'static str {
        match self {
            Self::A11y => "a11y-label",
            Self::Blocker => "blocker-label",
            Self::Critical => "critical-label",
            Self::Serious => "serious-label",
            Self::Moderate => "moderate-label",
            Self::Production => "production-label",
            Self::Released => "released-label",
        }
    }

    /// Returns the environment variables consulted when the flag is absent.
    ///
    /// The runner exports an input named `a11y-label` as `INPUT_A11Y-LABEL`,
    /// keeping the hyphen; the underscore spelling covers inputs declared as
    /// `a11y_label`.
    pub fn env_vars(self) -> [&'static str; 2] {
        match self {
            Self::A11y => ["INPUT_A11Y-LABEL", "INPUT_A11Y_LABEL"],
            Self::Blocker => ["INPUT_BLOCKER-LABEL", "INPUT_BLOCKER_LABEL"],
            Self::Critical => ["INPUT_CRITICAL-LABEL", "INPUT_CRITICAL_LABEL"],
            Self::Serious => ["INPUT_SERIOUS-LABEL", "INPUT_SERIOUS_LABEL"],
            Self::Moderate => ["INPUT_MODERATE-LABEL", "INPUT_MODERATE_LABEL"],
            Self::Production => ["INPUT_PRODUCTION-LABEL", "INPUT_PRODUCTION_LABEL"],
            Self::Released => ["INPUT_RELEASED-LABEL", "INPUT_RELEASED_LABEL"],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::A11y => "A11Y",
            Self::Blocker => "BLOCKER",
            Self::Critical => "CRITICAL",
            Self::Serious => "SERIOUS",
            Self::Moderate => "MODERATE",
            Self::Production => "PRODUCTION",
            Self::Released => "RELEASED",
        };
        f.write_str(name)
    }
}

/// Concrete label names bound to every [`Role`].
///
/// Every field is guaranteed non-empty once constructed through
/// [`LabelBinding::new`] or [`LabelParams::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelBinding {
    a11y: String,
    blocker: String,
    critical: String,
    serious: String,
    moderate: String,
    production: String,
    released: String,
}

impl LabelBinding {
    /// Builds a binding from a lookup of role to label name.
    ///
    /// The first role whose value is missing or blank is reported.
    pub fn new<F>(mut lookup: F) -> Result<Self, ConfigError>
    where
        F: FnMut(Role) -> Option<String>,
    {
        let mut take = |role: Role| -> Result<String, ConfigError> {
            lookup(role)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::MissingParameter {
                    name: role.param_name(),
                })
        };

        Ok(Self {
            a11y: take(Role::A11y)?,
            blocker: take(Role::Blocker)?,
            critical: take(Role::Critical)?,
            serious: take(Role::Serious)?,
            moderate: take(Role::Moderate)?,
            production: take(Role::Production)?,
            released: take(Role::Released)?,
        })
    }

    /// Returns the label name bound to `role`.
    pub fn label(&self, role: Role) -> &str {
        match role {
            Role::A11y => &self.a11y,
            Role::Blocker => &self.blocker,
            Role::Critical => &self.critical,
            Role::Serious => &self.serious,
            Role::Moderate => &self.moderate,
            Role::Production => &self.production,
            Role::Released => &self.released,
        }
    }
}

/// Label-name parameters as accepted on the command line.
#[derive(Args, Debug, Clone, Default)]
pub struct LabelParams {
    /// Label marking accessibility issues.
    #[arg(long = "a11y-label", value_name = "LABEL")]
    pub a11y: Option<String>,

    /// Label for blocker severity.
    #[arg(long = "blocker-label", value_name = "LABEL")]
    pub blocker: Option<String>,

    /// Label for critical severity.
    #[arg(long = "critical-label", value_name = "LABEL")]
    pub critical: Option<String>,

    /// Label for serious severity.
    #[arg(long = "serious-label", value_name = "LABEL")]
    pub serious: Option<String>,

    /// Label for moderate severity.
    #[arg(long = "moderate-label", value_name = "LABEL")]
    pub moderate: Option<String>,

    /// Label for defects found in production.
    #[arg(long = "production-label", value_name = "LABEL")]
    pub production: Option<String>,

    /// Label for defects found during a release cycle.
    #[arg(long = "released-label", value_name = "LABEL")]
    pub released: Option<String>,
}

impl LabelParams {
    fn flag(&self, role: Role) -> Option<&String> {
        match role {
            Role::A11y => self.a11y.as_ref(),
            Role::Blocker => self.blocker.as_ref(),
            Role::Critical => self.critical.as_ref(),
            Role::Serious => self.serious.as_ref(),
            Role::Moderate => self.moderate.as_ref(),
            Role::Production => self.production.as_ref(),
            Role::Released => self.released.as_ref(),
        }
    }

    /// Resolves every role: flag first, then environment, then settings file.
    pub fn resolve(&self, settings: &Settings) -> Result<LabelBinding, ConfigError> {
        LabelBinding::new(|role| {
            self.flag(role)
                .cloned()
                .or_else(|| settings.get_env_vars(&role.env_vars()))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub(crate) mod tests {
    use super::*;

    /// The label names used throughout the test suite.
    pub(crate) fn sample_binding() -> LabelBinding {
        LabelBinding::new(|role| Some(role.to_string())).unwrap()
    }

    #[test]
    fn binding_maps_every_role() {
        let binding = sample_binding();
        for role in Role::ALL {
            assert_eq!(binding.label(role), role.to_string());
        }
    }

    #[test]
    fn missing_role_names_the_parameter() {
        let err = LabelBinding::new(|role| match role {
            Role::Serious => None,
            other => Some(other.to_string()),
        })
        .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::MissingParameter {
                name: "serious-label"
            }
        ));
        assert!(err.to_string().contains("serious-label"));
    }

    #[test]
    fn blank_role_is_missing() {
        let err = LabelBinding::new(|role| match role {
            Role::Released => Some("   ".to_string()),
            other => Some(other.to_string()),
        })
        .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::MissingParameter {
                name: "released-label"
            }
        ));
    }

    #[test]
    fn flags_take_precedence_over_settings() {
        let settings = Settings::from_env_map(
            Role::ALL
                .iter()
                .map(|role| (role.env_vars()[1].to_string(), format!("settings-{role}")))
                .collect(),
        );
        let params = LabelParams {
            blocker: Some("sev:blocker".to_string()),
            ..Default::default()
        };

        let binding = params.resolve(&settings).unwrap();
        assert_eq!(binding.label(Role::Blocker), "sev:blocker");
        assert_eq!(binding.label(Role::Critical), "settings-CRITICAL");
    }
}
