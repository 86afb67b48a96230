//! Settings and configuration utilities.
//!
//! This module reads settings from $HOME/.a11y-triage/settings.json and uses
//! them as a fallback for environment variables.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Settings loaded from $HOME/.a11y-triage/settings.json.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Environment variable overrides.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Self::load_from_path(&settings_path)
    }

    /// Loads settings from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist, return default settings
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str::<Self>(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Creates settings from an explicit map of overrides.
    pub fn from_env_map(env: HashMap<String, String>) -> Self {
        Self { env }
    }

    /// Returns the default settings path.
    pub fn get_settings_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        Ok(home_dir.join(".a11y-triage").join("settings.json"))
    }

    /// Returns an environment variable with fallback to settings.
    ///
    /// Empty environment values count as unset.
    pub fn get_env_var(&self, key: &str) -> Option<String> {
        match env::var(key) {
            Ok(value) if !value.is_empty() => Some(value),
            _ => self.env.get(key).cloned(),
        }
    }

    /// Tries multiple keys in order, returning the first one set.
    pub fn get_env_vars(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.get_env_var(key))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn settings_load_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");

        let settings_json = r#"{
            "env": {
                "INPUT_A11Y_LABEL": "accessibility",
                "GITHUB_TOKEN": "test_token"
            }
        }"#;
        fs::write(&settings_path, settings_json).unwrap();

        let settings = Settings::load_from_path(&settings_path).unwrap();

        assert_eq!(
            settings.env.get("INPUT_A11Y_LABEL").unwrap(),
            "accessibility"
        );
        assert_eq!(settings.env.get("GITHUB_TOKEN").unwrap(), "test_token");
    }

    #[test]
    fn missing_settings_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load_from_path(temp_dir.path().join("absent.json")).unwrap();
        assert!(settings.env.is_empty());
    }

    #[test]
    fn malformed_settings_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");
        fs::write(&settings_path, "{ not json").unwrap();

        let err = Settings::load_from_path(&settings_path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse settings file"));
    }

    #[test]
    fn settings_get_env_var() {
        let settings = Settings::from_env_map(HashMap::from([
            (
                "A11Y_TRIAGE_TEST_VAR".to_string(),
                "from_settings".to_string(),
            ),
            (
                "A11Y_TRIAGE_TEST_FALLBACK".to_string(),
                "fallback".to_string(),
            ),
        ]));

        // Environment takes precedence
        env::set_var("A11Y_TRIAGE_TEST_VAR", "from_env");
        assert_eq!(
            settings.get_env_var("A11Y_TRIAGE_TEST_VAR").unwrap(),
            "from_env"
        );

        env::remove_var("A11Y_TRIAGE_TEST_VAR");
        assert_eq!(
            settings.get_env_var("A11Y_TRIAGE_TEST_VAR").unwrap(),
            "from_settings"
        );

        assert_eq!(
            settings
                .get_env_vars(&["A11Y_TRIAGE_TEST_UNSET", "A11Y_TRIAGE_TEST_FALLBACK"])
                .unwrap(),
            "fallback"
        );
        assert_eq!(settings.get_env_vars(&["A11Y_TRIAGE_TEST_UNSET"]), None);
    }
}
