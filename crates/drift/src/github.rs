use std::collections::HashMap;

use {serde::Deserialize, thiserror::Error};

const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Remaining-request threshold below which rate-limit state is logged.
const RATE_LIMIT_WARN_BELOW: u64 = 10;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API returned {status} for {owner}/{repo} at {git_ref}")]
    Status {
        status: reqwest::StatusCode,
        owner: String,
        repo: String,
        git_ref: String,
    },
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    sha: String,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

/// Minimal GitHub API client for recursive tree listings.
///
/// The base URL is injectable so tests can point it at a local server.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
}

impl Default for GithubClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GithubClient {
    #[must_use]
    pub fn new() -> Self {
        Self::with_base(DEFAULT_API_BASE)
    }

    #[must_use]
    pub fn with_base(api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into(),
        }
    }

    /// Fetch the recursive tree for `owner/repo` at `git_ref` and return the
    /// hash of every folder in it, keyed by repo-relative path.
    pub async fn fetch_folder_hashes(
        &self,
        owner: &str,
        repo: &str,
        git_ref: &str,
    ) -> Result<HashMap<String, String>, GithubError> {
        let url = format!(
            "{}/repos/{owner}/{repo}/git/trees/{git_ref}?recursive=1",
            self.api_base
        );
        tracing::debug!(%owner, %repo, %git_ref, "fetching repository tree");

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "devkit")
            .send()
            .await?;

        log_rate_limit(response.headers());

        let status = response.status();
        if !status.is_success() {
            return Err(GithubError::Status {
                status,
                owner: owner.to_string(),
                repo: repo.to_string(),
                git_ref: git_ref.to_string(),
            });
        }

        let body: TreeResponse = response.json().await?;
        if body.truncated {
            tracing::warn!(%owner, %repo, "tree listing truncated; some folders may be missing");
        }

        Ok(body
            .tree
            .into_iter()
            .filter(|entry| entry.kind == "tree")
            .map(|entry| (entry.path, entry.sha))
            .collect())
    }
}

fn log_rate_limit(headers: &reqwest::header::HeaderMap) {
    let remaining = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    if let Some(remaining) = remaining {
        if remaining < RATE_LIMIT_WARN_BELOW {
            let reset = headers
                .get("x-ratelimit-reset")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            tracing::warn!(remaining, reset, "GitHub API rate limit nearly exhausted");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn parses_folder_hashes_from_tree_listing() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/owner/repo/git/trees/main?recursive=1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"tree": [
                    {"path": "skills", "type": "tree", "sha": "aaa"},
                    {"path": "skills/review", "type": "tree", "sha": "bbb"},
                    {"path": "skills/review/SKILL.md", "type": "blob", "sha": "ccc"}
                ], "truncated": false}"#,
            )
            .create_async()
            .await;

        let client = GithubClient::with_base(server.url());
        let hashes = client.fetch_folder_hashes("owner", "repo", "main").await.unwrap();

        mock.assert_async().await;
        assert_eq!(hashes.get("skills/review").map(String::as_str), Some("bbb"));
        // Blobs are not folders.
        assert!(!hashes.contains_key("skills/review/SKILL.md"));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/o/r/git/trees/HEAD?recursive=1")
            .with_status(404)
            .create_async()
            .await;

        let client = GithubClient::with_base(server.url());
        let err = client.fetch_folder_hashes("o", "r", "HEAD").await.err().unwrap();
        assert!(matches!(err, GithubError::Status { status, .. } if status.as_u16() == 404));
    }
}
