use std::path::{Path, PathBuf};

use {
    anyhow::Context,
    chrono::Utc,
    devkit_common::{AGENTS_DIR, LOCK_FILE, LOCK_VERSION, Scope, WorkContext},
};

use crate::types::{LockEntry, LockFile};

/// Handle on one lock document at a fixed path.
///
/// Writes replace the whole document; concurrent writers are last-wins.
#[derive(Debug, Clone)]
pub struct LockStore {
    path: PathBuf,
}

impl LockStore {
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Project lock sits next to the project; the global lock lives under
    /// `~/.agents/`.
    #[must_use]
    pub fn for_scope(scope: Scope, ctx: &WorkContext) -> Self {
        let path = match scope {
            Scope::Project => ctx.cwd.join(LOCK_FILE),
            Scope::Global => ctx.home_dir.join(AGENTS_DIR).join(LOCK_FILE),
        };
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document. Never fails: a missing, unreadable, malformed, or
    /// older-format file reads as the empty document.
    pub async fn read(&self) -> LockFile {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::debug!(path = %self.path.display(), %e, "could not read lock file");
                }
                return LockFile::empty();
            },
        };
        let parsed: LockFile = match serde_json::from_str(&raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), %e, "malformed lock file, starting fresh");
                return LockFile::empty();
            },
        };
        if parsed.version < LOCK_VERSION {
            tracing::warn!(
                path = %self.path.display(),
                version = parsed.version,
                "outdated lock format, starting fresh"
            );
            return LockFile::empty();
        }
        parsed
    }

    /// Write the document, creating parent directories as needed.
    pub async fn write(&self, file: &LockFile) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(file)?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }

    /// Insert or replace one entry.
    ///
    /// An existing entry keeps its original `installedAt`; `updatedAt` is
    /// refreshed either way.
    pub async fn upsert(&self, key: &str, mut entry: LockEntry) -> anyhow::Result<()> {
        let mut file = self.read().await;
        entry.updated_at = Utc::now();
        if let Some(existing) = file.assets.get(key) {
            entry.installed_at = existing.installed_at;
        }
        file.assets.insert(key.to_string(), entry);
        self.write(&file).await
    }

    /// Delete one entry. Returns whether the key existed.
    pub async fn remove(&self, key: &str) -> anyhow::Result<bool> {
        let mut file = self.read().await;
        let existed = file.assets.remove(key).is_some();
        if existed {
            self.write(&file).await?;
        }
        Ok(existed)
    }

    /// Agent names the user last installed for, if any were recorded.
    pub async fn last_selected_agents(&self) -> Option<Vec<String>> {
        self.read().await.last_selected_agents
    }

    /// Record the agent selection for the next non-interactive run.
    pub async fn save_selected_agents(&self, agents: &[String]) -> anyhow::Result<()> {
        let mut file = self.read().await;
        file.last_selected_agents = Some(agents.to_vec());
        self.write(&file).await
    }
}
