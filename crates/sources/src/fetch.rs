use std::{
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};

use thiserror::Error;

const CLONE_TIMEOUT: Duration = Duration::from_secs(60);

/// Categorized failure from the repository fetcher.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Rejected before any process spawn: empty or flag-like URL.
    #[error("invalid git URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: &'static str },

    #[error(
        "clone of {url} timed out after {}s; check that you have access and \
         your SSH keys or credentials are configured",
        CLONE_TIMEOUT.as_secs()
    )]
    Timeout { url: String },

    #[error("authentication failed for {url}; for private repos, ensure you have access")]
    Auth { url: String, detail: String },

    #[error("failed to clone {url}: {detail}")]
    Failed { url: String, detail: String },
}

impl FetchError {
    /// Whether this failure is worth an SSH-credentials remediation hint.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }
}

/// Reject URLs that are empty or would be interpreted as a flag by the
/// underlying `git clone` invocation.
pub fn validate_clone_url(url: &str) -> Result<(), FetchError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(FetchError::InvalidUrl {
            url: url.to_string(),
            reason: "URL cannot be empty",
        });
    }
    if trimmed.starts_with('-') {
        return Err(FetchError::InvalidUrl {
            url: url.to_string(),
            reason: "URL must not start with '-'",
        });
    }
    Ok(())
}

fn looks_like_auth_failure(stderr: &str) -> bool {
    ["Authentication failed", "could not read Username", "Permission denied", "Repository not found"]
        .iter()
        .any(|needle| stderr.contains(needle))
}

/// Shallow-clone `url` (optionally at `git_ref`) into a fresh directory
/// under the system temp root and return that directory.
///
/// The clone runs under a hard 60 s wall-clock timeout; on any failure the
/// partially created directory is removed before the error is returned.
/// Callers own the returned directory and release it with
/// [`cleanup_temp_dir`].
pub async fn clone_repo(url: &str, git_ref: Option<&str>) -> Result<PathBuf, FetchError> {
    validate_clone_url(url)?;

    let temp_dir = tempfile::Builder::new()
        .prefix("devkit-")
        .tempdir()
        .map_err(|e| FetchError::Failed {
            url: url.to_string(),
            detail: format!("could not create temp directory: {e}"),
        })?
        .keep();

    let mut cmd = tokio::process::Command::new("git");
    cmd.arg("clone").args(["--depth", "1"]);
    if let Some(git_ref) = git_ref {
        cmd.args(["--branch", git_ref]);
    }
    cmd.arg(url.trim())
        .arg(&temp_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        // Abandoning the future on timeout must not leak the process.
        .kill_on_drop(true);

    tracing::debug!(%url, git_ref, dir = %temp_dir.display(), "cloning repository");

    let output = match tokio::time::timeout(CLONE_TIMEOUT, cmd.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            remove_dir_best_effort(&temp_dir).await;
            return Err(FetchError::Failed {
                url: url.to_string(),
                detail: format!("could not run git: {e}"),
            });
        },
        Err(_) => {
            remove_dir_best_effort(&temp_dir).await;
            return Err(FetchError::Timeout { url: url.to_string() });
        },
    };

    if !output.status.success() {
        remove_dir_best_effort(&temp_dir).await;
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if looks_like_auth_failure(&stderr) {
            return Err(FetchError::Auth {
                url: url.to_string(),
                detail: stderr,
            });
        }
        return Err(FetchError::Failed {
            url: url.to_string(),
            detail: stderr,
        });
    }

    Ok(temp_dir)
}

async fn remove_dir_best_effort(dir: &Path) {
    if let Err(e) = tokio::fs::remove_dir_all(dir).await {
        tracing::debug!(dir = %dir.display(), %e, "failed to remove partial clone directory");
    }
}

/// Remove an ephemeral clone directory.
///
/// Refuses to delete anything not verified, by canonicalized-prefix check,
/// to live inside the system temp directory. A directory that no longer
/// exists counts as already cleaned up.
pub async fn cleanup_temp_dir(dir: &Path) -> anyhow::Result<()> {
    let resolved = match tokio::fs::canonicalize(dir).await {
        Ok(resolved) => resolved,
        Err(_) => return Ok(()),
    };
    let temp_root = tokio::fs::canonicalize(std::env::temp_dir()).await?;

    if resolved != temp_root && !resolved.starts_with(&temp_root) {
        anyhow::bail!(
            "refusing to clean up {} outside of the temp directory",
            resolved.display()
        );
    }

    tokio::fs::remove_dir_all(&resolved).await?;
    Ok(())
}
