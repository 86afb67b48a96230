//! Configuration error handling.

use thiserror::Error;

/// Fatal configuration errors.
///
/// Absence of a configuration file is not an error; these variants abort
/// the run before any issue is classified.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required label-name parameter was missing or empty.
    #[error("Required parameter --{name} is missing or empty")]
    MissingParameter {
        /// Name of the offending parameter.
        name: &'static str,
    },

    /// A configuration file was present and parsed but had the wrong shape.
    #[error("Invalid configuration in {path}: {reason}")]
    Malformed {
        /// Candidate path that produced the invalid document.
        path: String,
        /// What was wrong with it.
        reason: String,
    },
}
