use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use crate::frontmatter::description_of;

/// A single-file asset: a command prompt or a rules document.
#[derive(Debug, Clone)]
pub struct FlatAsset {
    /// File stem, used as the asset name.
    pub name: String,
    /// Frontmatter description when present, empty otherwise.
    pub description: String,
    pub path: PathBuf,
    pub content: String,
}

/// Collect markdown files directly inside `dir` (no recursion).
async fn scan_flat_md(dir: &Path, seen: &mut HashSet<String>, out: &mut Vec<FlatAsset>) {
    let Ok(mut entries) = tokio::fs::read_dir(dir).await else {
        return;
    };
    let mut files: Vec<PathBuf> = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            files.push(path);
        }
    }
    // Directory iteration order is platform-dependent.
    files.sort();

    for path in files {
        let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };
        if !seen.insert(stem.to_lowercase()) {
            continue;
        }
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(path = %path.display(), %e, "skipping unreadable asset file");
                continue;
            },
        };
        out.push(FlatAsset {
            name: stem,
            description: description_of(&content),
            path,
            content,
        });
    }
}

async fn discover_flat(base: &Path, subdir: &str) -> Vec<FlatAsset> {
    let mut seen = HashSet::new();
    let mut assets = Vec::new();
    // The base itself outranks its conventional subdirectory.
    scan_flat_md(base, &mut seen, &mut assets).await;
    scan_flat_md(&base.join(subdir), &mut seen, &mut assets).await;
    assets
}

/// Discover command prompts: `*.md` directly in `base` or `base/commands`.
pub async fn discover_commands(base: &Path) -> Vec<FlatAsset> {
    discover_flat(base, "commands").await
}

/// Discover rules documents: `*.md` directly in `base` or `base/rules`.
pub async fn discover_rules(base: &Path) -> Vec<FlatAsset> {
    discover_flat(base, "rules").await
}
