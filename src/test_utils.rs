//! Shared test utilities.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::classify::Issue;
use crate::github::GitHubError;
use crate::tracker::{BoxFuture, ContentSource, IssueTracker};

/// In-memory tracker with scripted files, issues and label failures.
///
/// Every fetch and label request is recorded so tests can inspect which
/// calls were made and in what order.
#[derive(Default)]
pub(crate) struct MockTracker {
    files: HashMap<String, String>,
    issues: Vec<Issue>,
    /// Remaining number of failures to return per issue.
    failures: Mutex<HashMap<u64, usize>>,
    /// HTTP status every label request for an issue is rejected with.
    rejections: HashMap<u64, u16>,
    fetched: Mutex<Vec<String>>,
    listed: Mutex<Vec<String>>,
    applied: Mutex<Vec<(u64, Vec<String>)>>,
    attempts: Mutex<HashMap<u64, usize>>,
}

impl MockTracker {
    /// Creates a tracker with no files and no issues.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds a file served by [`ContentSource::fetch_content`].
    #[must_use]
    pub(crate) fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    /// Sets the issues returned by [`IssueTracker::list_open_issues`].
    #[must_use]
    pub(crate) fn with_issues(mut self, issues: Vec<Issue>) -> Self {
        self.issues = issues;
        self
    }

    /// Makes the first `times` label requests for `issue` fail.
    #[must_use]
    pub(crate) fn failing(self, issue: u64, times: usize) -> Self {
        self.failures.lock().unwrap().insert(issue, times);
        self
    }

    /// Makes every label request for `issue` fail with HTTP `status`.
    #[must_use]
    pub(crate) fn rejecting(mut self, issue: u64, status: u16) -> Self {
        self.rejections.insert(issue, status);
        self
    }

    /// Returns every path requested so far.
    pub(crate) fn fetched_paths(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    /// Returns the labels passed to each list request.
    pub(crate) fn listed_labels(&self) -> Vec<String> {
        self.listed.lock().unwrap().clone()
    }

    /// Returns every successful label application, sorted by issue.
    pub(crate) fn applied(&self) -> Vec<(u64, Vec<String>)> {
        let mut applied = self.applied.lock().unwrap().clone();
        applied.sort();
        applied
    }

    /// Returns how many label requests were made for `issue`.
    pub(crate) fn attempts(&self, issue: u64) -> usize {
        self.attempts
            .lock()
            .unwrap()
            .get(&issue)
            .copied()
            .unwrap_or(0)
    }
}

impl ContentSource for MockTracker {
    fn fetch_content<'a>(&'a self, path: &'a str) -> BoxFuture<'a, String> {
        Box::pin(async move {
            self.fetched.lock().unwrap().push(path.to_string());
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("404 Not Found: {path}"))
        })
    }
}

impl IssueTracker for MockTracker {
    fn list_open_issues<'a>(&'a self, label: &'a str) -> BoxFuture<'a, Vec<Issue>> {
        Box::pin(async move {
            self.listed.lock().unwrap().push(label.to_string());
            Ok(self.issues.clone())
        })
    }

    fn add_labels<'a>(&'a self, issue: u64, labels: &'a [String]) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            *self.attempts.lock().unwrap().entry(issue).or_insert(0) += 1;

            if let Some(&status) = self.rejections.get(&issue) {
                return Err(GitHubError::ApiRequestFailed {
                    status,
                    body: "Validation Failed".to_string(),
                }
                .into());
            }

            {
                let mut failures = self.failures.lock().unwrap();
                if let Some(remaining) = failures.get_mut(&issue) {
                    if *remaining > 0 {
                        *remaining -= 1;
                        anyhow::bail!("HTTP 502 Bad Gateway for issue #{issue}");
                    }
                }
            }

            self.applied.lock().unwrap().push((issue, labels.to_vec()));
            Ok(())
        })
    }
}
