//! GitHub REST client for issues, labels and repository contents.

use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;

use base64::Engine as _;
use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, LINK};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use super::{GitHubError, RepoSlug};
use crate::classify::Issue;
use crate::tracker::{BoxFuture, ContentSource, IssueTracker};

/// Public GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Timeout applied to every API request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const PER_PAGE: &str = "100";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("a11y-triage/", env!("CARGO_PKG_VERSION"));

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static NEXT_LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<([^>]+)>\s*;\s*rel="next""#).unwrap());

/// Issue as returned by the issues endpoint.
#[derive(Deserialize)]
struct IssuePayload {
    number: u64,
    created_at: DateTime<Utc>,
    #[serde(default)]
    labels: Vec<LabelPayload>,
}

/// Labels appear either as objects or, in older payloads, bare names.
#[derive(Deserialize)]
#[serde(untagged)]
enum LabelPayload {
    Object { name: String },
    Name(String),
}

impl From<IssuePayload> for Issue {
    fn from(payload: IssuePayload) -> Self {
        Self {
            id: payload.number,
            created_at: payload.created_at,
            labels: payload
                .labels
                .into_iter()
                .map(|label| match label {
                    LabelPayload::Object { name } | LabelPayload::Name(name) => name,
                })
                .collect(),
        }
    }
}

/// File entry as returned by the contents endpoint.
#[derive(Deserialize)]
struct ContentPayload {
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: Option<String>,
}

impl ContentPayload {
    fn decode(self) -> Result<String, GitHubError> {
        match self.encoding.as_deref() {
            Some("base64") => {
                let cleaned: String = self
                    .content
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(cleaned)
                    .map_err(|e| GitHubError::InvalidResponseFormat(e.to_string()))?;
                String::from_utf8(bytes)
                    .map_err(|e| GitHubError::InvalidResponseFormat(e.to_string()))
            }
            None => Ok(self.content),
            Some(other) => Err(GitHubError::InvalidResponseFormat(format!(
                "unsupported content encoding '{other}'"
            ))),
        }
    }
}

/// Request body for adding labels to an issue.
#[derive(Serialize)]
struct AddLabelsRequest<'a> {
    labels: &'a [String],
}

/// GitHub client scoped to one repository.
pub struct GitHubClient {
    /// HTTP client for API requests.
    client: Client,
    /// API base URL.
    api_url: Url,
    /// Token sent as a bearer credential.
    token: String,
    /// Repository all requests address.
    repo: RepoSlug,
    /// Revision used when reading repository contents.
    git_ref: Option<String>,
}

impl GitHubClient {
    /// Creates a client for `repo` talking to `api_url`.
    pub fn new(api_url: &str, token: String, repo: RepoSlug) -> Result<Self, GitHubError> {
        let api_url =
            Url::parse(api_url).map_err(|e| GitHubError::InvalidUrl(format!("{api_url}: {e}")))?;
        if api_url.cannot_be_a_base() {
            return Err(GitHubError::InvalidUrl(api_url.to_string()));
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GitHubError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            api_url,
            token,
            repo,
            git_ref: None,
        })
    }

    /// Reads repository contents at `git_ref` instead of the default branch.
    #[must_use]
    pub fn with_ref(mut self, git_ref: Option<String>) -> Self {
        self.git_ref = git_ref;
        self
    }

    /// Returns the repository this client addresses.
    pub fn repo(&self) -> &RepoSlug {
        &self.repo
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, GitHubError> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| GitHubError::InvalidUrl(self.api_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    async fn send(builder: RequestBuilder) -> Result<Response, GitHubError> {
        let response = builder
            .send()
            .await
            .map_err(|e| GitHubError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|e| {
                debug!("Failed to read error response body: {e}");
                String::new()
            });
            return Err(GitHubError::ApiRequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    /// Lists every open issue carrying `label`, following pagination.
    pub async fn fetch_open_issues(&self, label: &str) -> Result<Vec<Issue>, GitHubError> {
        let mut url = self.endpoint(&[
            "repos",
            self.repo.owner.as_str(),
            self.repo.name.as_str(),
            "issues",
        ])?;
        url.query_pairs_mut()
            .append_pair("labels", label)
            .append_pair("state", "open")
            .append_pair("per_page", PER_PAGE);

        let mut issues = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(url);
        while let Some(url) = next.take() {
            debug!(url = %url, "Fetching issue page");
            visited.insert(url.clone());
            let response = Self::send(self.request(Method::GET, url)).await?;
            next = next_page(response.headers()).filter(|next| {
                let fresh = !visited.contains(next);
                if !fresh {
                    warn!(url = %next, "Link header points to a page already fetched; stopping");
                }
                fresh
            });

            let page: Vec<IssuePayload> = response
                .json()
                .await
                .map_err(|e| GitHubError::InvalidResponseFormat(e.to_string()))?;
            issues.extend(page.into_iter().map(Issue::from));
        }

        info!(repo = %self.repo, label, count = issues.len(), "Fetched open issues");
        Ok(issues)
    }

    /// Reads the file at `path` from the repository.
    pub async fn fetch_file(&self, path: &str) -> Result<String, GitHubError> {
        let mut segments: Vec<&str> = vec![
            "repos",
            self.repo.owner.as_str(),
            self.repo.name.as_str(),
            "contents",
        ];
        segments.extend(path.split('/').filter(|segment| !segment.is_empty()));
        let mut url = self.endpoint(&segments)?;
        if let Some(git_ref) = &self.git_ref {
            url.query_pairs_mut().append_pair("ref", git_ref);
        }

        debug!(url = %url, "Fetching repository content");
        let payload: ContentPayload = Self::send(self.request(Method::GET, url))
            .await?
            .json()
            .await
            .map_err(|e| GitHubError::InvalidResponseFormat(e.to_string()))?;

        payload.decode()
    }

    /// Adds `labels` to issue number `issue`.
    pub async fn post_labels(&self, issue: u64, labels: &[String]) -> Result<(), GitHubError> {
        let number = issue.to_string();
        let url = self.endpoint(&[
            "repos",
            self.repo.owner.as_str(),
            self.repo.name.as_str(),
            "issues",
            number.as_str(),
            "labels",
        ])?;

        info!(issue, labels = ?labels, "Adding labels to issue");
        Self::send(
            self.request(Method::POST, url)
                .json(&AddLabelsRequest { labels }),
        )
        .await?;
        Ok(())
    }
}

/// Extracts the `rel="next"` target from a `Link` header.
fn next_page(headers: &HeaderMap) -> Option<Url> {
    let link = headers.get(LINK)?.to_str().ok()?;
    let target = NEXT_LINK_PATTERN.captures(link)?.get(1)?;
    Url::parse(target.as_str()).ok()
}

impl ContentSource for GitHubClient {
    fn fetch_content<'a>(&'a self, path: &'a str) -> BoxFuture<'a, String> {
        Box::pin(async move { Ok(self.fetch_file(path).await?) })
    }
}

impl IssueTracker for GitHubClient {
    fn list_open_issues<'a>(&'a self, label: &'a str) -> BoxFuture<'a, Vec<Issue>> {
        Box::pin(async move { Ok(self.fetch_open_issues(label).await?) })
    }

    fn add_labels<'a>(&'a self, issue: u64, labels: &'a [String]) -> BoxFuture<'a, ()> {
        Box::pin(async move { Ok(self.post_labels(issue, labels).await?) })
    }
}
