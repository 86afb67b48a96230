//! Resolution of the enabled flag from candidate configuration files.

use serde::Serialize;
use serde_yaml::Value;
use tracing::{debug, info, warn};

use super::error::ConfigError;
use crate::tracker::ContentSource;

/// Path of the configuration file, without extension.
pub const DEFAULT_CONFIG_STEM: &str = ".github/a11y-triage";

/// Extensions tried for the configuration file, in preference order.
pub const CONFIG_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Outcome of configuration resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    /// Whether triage should run.
    pub enabled: bool,
    /// Candidate path that supplied the value, if any file did.
    pub source: Option<String>,
}

impl ResolvedConfig {
    /// The fail-closed result used when no candidate yields a document.
    pub fn absent() -> Self {
        Self {
            enabled: false,
            source: None,
        }
    }
}

/// Walks candidate files in order; the first that parses wins.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    candidates: Vec<String>,
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_STEM)
    }
}

impl ConfigResolver {
    /// Creates a resolver trying `stem` with each of [`CONFIG_EXTENSIONS`].
    pub fn new(stem: &str) -> Self {
        Self {
            candidates: CONFIG_EXTENSIONS
                .iter()
                .map(|ext| format!("{stem}.{ext}"))
                .collect(),
        }
    }

    /// Creates a resolver with an explicit candidate list.
    pub fn with_candidates(candidates: Vec<String>) -> Self {
        Self { candidates }
    }

    /// Returns the candidate paths in the order they are tried.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Resolves the enabled flag.
    ///
    /// Missing or unparsable candidates are skipped. A candidate that parses
    /// but has the wrong shape aborts resolution.
    pub async fn resolve(&self, source: &dyn ContentSource) -> Result<ResolvedConfig, ConfigError> {
        for path in &self.candidates {
            let content = match source.fetch_content(path).await {
                Ok(content) => content,
                Err(e) => {
                    debug!(path = %path, error = %e, "Configuration candidate not available");
                    continue;
                }
            };

            let document: Value = match serde_yaml::from_str(&content) {
                Ok(document) => document,
                Err(e) => {
                    warn!(path = %path, error = %e, "Failed to parse configuration candidate");
                    continue;
                }
            };

            let enabled = enabled_flag(path, &document)?;
            info!(path = %path, enabled, "Resolved configuration");
            return Ok(ResolvedConfig {
                enabled,
                source: Some(path.clone()),
            });
        }

        debug!(candidates = ?self.candidates, "No configuration file found");
        Ok(ResolvedConfig::absent())
    }
}

/// Extracts the strictly boolean `enabled` field from a parsed document.
fn enabled_flag(path: &str, document: &Value) -> Result<bool, ConfigError> {
    let malformed = |reason: String| ConfigError::Malformed {
        path: path.to_string(),
        reason,
    };

    let Value::Mapping(map) = document else {
        return Err(malformed(format!(
            "expected a mapping, found {}",
            kind(document)
        )));
    };

    match map.get("enabled") {
        Some(Value::Bool(enabled)) => Ok(*enabled),
        Some(other) => Err(malformed(format!(
            "`enabled` must be a boolean, found {}",
            kind(other)
        ))),
        None => Err(malformed("missing `enabled` field".to_string())),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::test_utils::MockTracker;

    fn resolver() -> ConfigResolver {
        ConfigResolver::default()
    }

    #[test]
    fn default_candidates_prefer_yaml() {
        assert_eq!(
            resolver().candidates(),
            [
                ".github/a11y-triage.yaml".to_string(),
                ".github/a11y-triage.yml".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn no_candidates_means_disabled() {
        let source = MockTracker::new();
        let resolved = resolver().resolve(&source).await.unwrap();
        assert_eq!(resolved, ResolvedConfig::absent());
        assert_eq!(source.fetched_paths().len(), 2);
    }

    #[tokio::test]
    async fn first_valid_candidate_wins() {
        let source = MockTracker::new()
            .with_file(".github/a11y-triage.yaml", "enabled: false\n")
            .with_file(".github/a11y-triage.yml", "enabled: true\n");

        let resolved = resolver().resolve(&source).await.unwrap();
        assert!(!resolved.enabled);
        assert_eq!(resolved.source.as_deref(), Some(".github/a11y-triage.yaml"));
        assert_eq!(source.fetched_paths(), [".github/a11y-triage.yaml"]);
    }

    #[tokio::test]
    async fn unparsable_candidate_falls_through() {
        let source = MockTracker::new()
            .with_file(".github/a11y-triage.yaml", "enabled: [true\n")
            .with_file(".github/a11y-triage.yml", "enabled: true\n");

        let resolved = resolver().resolve(&source).await.unwrap();
        assert!(resolved.enabled);
        assert_eq!(resolved.source.as_deref(), Some(".github/a11y-triage.yml"));
    }

    #[tokio::test]
    async fn string_enabled_aborts_without_fallthrough() {
        let source = MockTracker::new()
            .with_file(".github/a11y-triage.yaml", "enabled: \"true\"\n")
            .with_file(".github/a11y-triage.yml", "enabled: true\n");

        let err = resolver().resolve(&source).await.unwrap_err();
        match err {
            ConfigError::Malformed { path, reason } => {
                assert_eq!(path, ".github/a11y-triage.yaml");
                assert!(reason.contains("string"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(source.fetched_paths(), [".github/a11y-triage.yaml"]);
    }

    #[tokio::test]
    async fn non_mapping_documents_are_malformed() {
        for content in ["~\n", "- enabled\n", "true\n"] {
            let source = MockTracker::new().with_file(".github/a11y-triage.yml", content);
            let err = resolver().resolve(&source).await.unwrap_err();
            assert!(
                matches!(err, ConfigError::Malformed { .. }),
                "{content:?} should be malformed"
            );
        }
    }

    #[tokio::test]
    async fn missing_enabled_field_is_malformed() {
        let source = MockTracker::new().with_file(".github/a11y-triage.yaml", "other: 1\n");
        let err = resolver().resolve(&source).await.unwrap_err();
        assert!(err.to_string().contains("missing `enabled`"));
    }

    #[tokio::test]
    async fn extra_keys_are_ignored() {
        let source = MockTracker::new().with_file(
            ".github/a11y-triage.yaml",
            "enabled: true\nowner: accessibility-team\n",
        );
        assert!(resolver().resolve(&source).await.unwrap().enabled);
    }

    #[tokio::test]
    async fn custom_stem_changes_candidates() {
        let source = MockTracker::new().with_file("triage/config.yml", "enabled: true\n");
        let resolved = ConfigResolver::new("triage/config")
            .resolve(&source)
            .await
            .unwrap();
        assert!(resolved.enabled);
    }
}
