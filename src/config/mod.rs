//! Triage configuration: label-name bindings and the enabled flag.

pub mod error;
pub mod labels;
pub mod resolver;

pub use error::ConfigError;
pub use labels::{LabelBinding, LabelParams, Role};
pub use resolver::{ConfigResolver, ResolvedConfig, CONFIG_EXTENSIONS, DEFAULT_CONFIG_STEM};
