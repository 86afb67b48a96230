//! # a11y-triage
//!
//! Escalates aging accessibility issues into SLA categories.
//!
//! ## Features
//!
//! - Rule-table classification by deployment stage, severity and age
//! - Repository-level enable switch read from `.github/a11y-triage.yaml`
//! - Concurrent label application with bounded retries
//!
//! ## Quick Start
//!
//! ```rust
//! use a11y_triage::classify::Category;
//!
//! assert_eq!(Category::Cat2.label(), "CAT2");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod classify;
pub mod cli;
pub mod config;
pub mod github;
pub mod tracker;
pub mod triage;
pub mod utils;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_utils;

pub use crate::cli::Cli;

/// The current version of a11y-triage.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
