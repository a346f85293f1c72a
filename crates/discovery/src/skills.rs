use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use devkit_agents::AgentKind;

use crate::frontmatter::parse_marker;

/// Marker file naming a skill directory.
pub const MARKER_FILE: &str = "SKILL.md";

/// Directories never descended into during the exhaustive walk.
const SKIP_DIRS: &[&str] = &["node_modules", ".git", "dist", "build", "target", "__pycache__"];

/// Depth bound for the exhaustive fallback walk.
const MAX_DEPTH: usize = 5;

/// One discovered skill: a directory holding a valid marker file.
#[derive(Debug, Clone)]
pub struct Skill {
    pub name: String,
    pub description: String,
    /// The owning directory.
    pub path: PathBuf,
    /// Full marker file content, fingerprinted by the lock store.
    pub raw_content: String,
    pub metadata: Option<serde_yaml::Value>,
}

impl Skill {
    /// Name shown to the user; falls back to the directory name.
    #[must_use]
    pub fn display_name(&self) -> String {
        if !self.name.is_empty() {
            return self.name.clone();
        }
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DiscoverOptions {
    /// Include skills flagged `internal` (the user asked for one by name,
    /// or the env opt-in is set).
    pub include_internal: bool,
    /// Keep searching subdirectories even when the search path itself is a
    /// skill.
    pub full_depth: bool,
}

/// Fixed probe list, in priority order: the search path, generic skill
/// locations, then each known agent's dotted directory convention.
fn probe_dirs(search_path: &Path) -> Vec<PathBuf> {
    let mut dirs = vec![
        search_path.to_path_buf(),
        search_path.join("skills"),
        search_path.join("skills/.curated"),
        search_path.join("skills/.experimental"),
        search_path.join("skills/.system"),
        search_path.join(".agent/skills"),
        search_path.join(".agents/skills"),
    ];
    let mut seen: HashSet<PathBuf> = dirs.iter().cloned().collect();
    for agent in AgentKind::ALL {
        let dir = search_path.join(agent.profile().skills_dir);
        if seen.insert(dir.clone()) {
            dirs.push(dir);
        }
    }
    dirs
}

async fn read_skill(dir: &Path, opts: DiscoverOptions) -> Option<Skill> {
    let marker_path = dir.join(MARKER_FILE);
    let content = tokio::fs::read_to_string(&marker_path).await.ok()?;
    let marker = match parse_marker(&content) {
        Ok(marker) => marker,
        Err(e) => {
            tracing::debug!(path = %marker_path.display(), %e, "skipping non-conforming marker");
            return None;
        },
    };
    if marker.is_internal() && !opts.include_internal {
        tracing::debug!(path = %marker_path.display(), "skipping internal skill");
        return None;
    }
    Some(Skill {
        name: marker.name,
        description: marker.description,
        path: dir.to_path_buf(),
        raw_content: content,
        metadata: marker.metadata,
    })
}

/// Collect skills from the immediate child directories of one probe dir.
async fn scan_children(dir: PathBuf, opts: DiscoverOptions) -> Vec<Skill> {
    let mut found = Vec::new();
    let Ok(mut entries) = tokio::fs::read_dir(&dir).await else {
        return found;
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        let child = entry.path();
        if !child.is_dir() {
            continue;
        }
        if let Some(skill) = read_skill(&child, opts).await {
            found.push(skill);
        }
    }
    found
}

/// Exhaustive depth-bounded walk collecting every skill directory.
async fn walk_skill_dirs(root: &Path, opts: DiscoverOptions) -> Vec<Skill> {
    let mut found = Vec::new();
    let mut pending = vec![(root.to_path_buf(), 0usize)];

    while let Some((dir, depth)) = pending.pop() {
        if depth > MAX_DEPTH {
            continue;
        }
        if let Some(skill) = read_skill(&dir, opts).await {
            found.push(skill);
        }
        let Ok(mut entries) = tokio::fs::read_dir(&dir).await else {
            continue;
        };
        while let Ok(Some(entry)) = entries.next_entry().await {
            let child = entry.path();
            let skip = entry
                .file_name()
                .to_str()
                .is_some_and(|name| SKIP_DIRS.contains(&name));
            if child.is_dir() && !skip {
                pending.push((child, depth + 1));
            }
        }
    }
    found
}

/// Discover skills under `base` (optionally narrowed to `subpath`),
/// deduplicated case-insensitively by name.
///
/// Probe directories are read concurrently but merged in the fixed priority
/// order, so results are reproducible regardless of I/O timing. Never fails;
/// unreadable input yields an empty list.
pub async fn discover_skills(
    base: &Path,
    subpath: Option<&str>,
    opts: DiscoverOptions,
) -> Vec<Skill> {
    let search_path = match subpath {
        Some(sub) => base.join(sub),
        None => base.to_path_buf(),
    };

    let mut skills: Vec<Skill> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    // The search path itself may be a single skill.
    if let Some(skill) = read_skill(&search_path, opts).await {
        seen.insert(skill.name.to_lowercase());
        skills.push(skill);
        if !opts.full_depth {
            return skills;
        }
    }

    // Fan out over the probe list; merge in declared order, first name wins.
    let probes = probe_dirs(&search_path);
    let results =
        futures::future::join_all(probes.into_iter().map(|dir| scan_children(dir, opts))).await;
    for skill in results.into_iter().flatten() {
        if seen.insert(skill.name.to_lowercase()) {
            skills.push(skill);
        }
    }

    if skills.is_empty() || opts.full_depth {
        for skill in walk_skill_dirs(&search_path, opts).await {
            if seen.insert(skill.name.to_lowercase()) {
                skills.push(skill);
            }
        }
    }

    skills
}

/// Narrow `skills` to those whose name or display name matches any of
/// `names`, case-insensitively.
#[must_use]
pub fn filter_skills(skills: &[Skill], names: &[String]) -> Vec<Skill> {
    let wanted: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();
    skills
        .iter()
        .filter(|skill| {
            let name = skill.name.to_lowercase();
            let display = skill.display_name().to_lowercase();
            wanted.iter().any(|w| *w == name || *w == display)
        })
        .cloned()
        .collect()
}
