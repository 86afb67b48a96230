//! GitHub REST API collaborator.

pub mod client;
pub mod error;

use std::fmt;
use std::str::FromStr;

pub use client::{GitHubClient, DEFAULT_API_URL};
pub use error::GitHubError;

/// A repository identified as `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    /// Owning user or organization.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl FromStr for RepoSlug {
    type Err = GitHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GitHubError::InvalidRepository(s.to_string());
        let (owner, name) = s.trim().split_once('/').ok_or_else(invalid)?;
        let name = name.strip_suffix(".git").unwrap_or(name);
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_owner_and_name() {
        let slug: RepoSlug = "acme/storefront".parse().unwrap();
        assert_eq!(slug.owner, "acme");
        assert_eq!(slug.name, "storefront");
        assert_eq!(slug.to_string(), "acme/storefront");
    }

    #[test]
    fn strips_git_suffix() {
        let slug: RepoSlug = "acme/storefront.git".parse().unwrap();
        assert_eq!(slug.name, "storefront");
    }

    #[test]
    fn rejects_malformed_slugs() {
        for input in [
            "storefront",
            "/storefront",
            "acme/",
            "acme/.git",
            "acme/store/front",
        ] {
            assert!(
                matches!(
                    input.parse::<RepoSlug>(),
                    Err(GitHubError::InvalidRepository(_))
                ),
                "{input}"
            );
        }
    }
}
