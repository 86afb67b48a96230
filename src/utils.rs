//! Utility functions and helpers.

pub mod preflight;
pub mod settings;

pub use preflight::{check_github_token, check_label_parameters, check_repository};
pub use settings::Settings;
