//! Seams to the issue tracker and repository content.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use anyhow::{Context, Result};

use crate::classify::Issue;

/// Boxed future returned by the tracker traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Reads raw file content from a repository.
pub trait ContentSource: Send + Sync {
    /// Fetches the content stored at `path`.
    ///
    /// Callers treat every error as absence of the file.
    fn fetch_content<'a>(&'a self, path: &'a str) -> BoxFuture<'a, String>;
}

/// Lists issues and applies labels.
pub trait IssueTracker: Send + Sync {
    /// Returns every open issue carrying `label`.
    fn list_open_issues<'a>(&'a self, label: &'a str) -> BoxFuture<'a, Vec<Issue>>;

    /// Adds `labels` to issue `issue`.
    fn add_labels<'a>(&'a self, issue: u64, labels: &'a [String]) -> BoxFuture<'a, ()>;
}

/// Reads content from a directory on disk, typically a checkout.
#[derive(Debug, Clone)]
pub struct LocalContentSource {
    root: PathBuf,
}

impl LocalContentSource {
    /// Creates a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ContentSource for LocalContentSource {
    fn fetch_content<'a>(&'a self, path: &'a str) -> BoxFuture<'a, String> {
        Box::pin(async move {
            let full_path = self.root.join(path);
            tokio::fs::read_to_string(&full_path)
                .await
                .with_context(|| format!("Failed to read file: {}", full_path.display()))
        })
    }
}
