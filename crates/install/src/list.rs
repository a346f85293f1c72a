use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use {
    devkit_agents::AgentKind,
    devkit_common::{Scope, WorkContext},
    devkit_discovery::{MARKER_FILE, frontmatter::parse_marker},
};

/// A skill found on disk, with every agent directory it appears in.
#[derive(Debug, Clone)]
pub struct InstalledSkill {
    pub name: String,
    pub description: String,
    /// First location seen; the shared `.agents/skills` dir wins over
    /// agent-specific copies.
    pub path: PathBuf,
    pub scope: Scope,
    /// Empty when the skill only lives in the shared directory.
    pub agents: Vec<AgentKind>,
}

async fn scan_skill_dirs(dir: &Path) -> Vec<(String, String, PathBuf)> {
    let mut found = Vec::new();
    let Ok(mut entries) = tokio::fs::read_dir(dir).await else {
        return found;
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Ok(content) = tokio::fs::read_to_string(path.join(MARKER_FILE)).await else {
            continue;
        };
        match parse_marker(&content) {
            Ok(marker) => found.push((marker.name, marker.description, path)),
            Err(e) => {
                tracing::debug!(path = %path.display(), %e, "skipping unparseable installed skill");
            },
        }
    }
    found.sort();
    found
}

/// Enumerate installed skills for a scope: the shared `.agents/skills`
/// directory plus every agent's own directory, merged case-insensitively
/// by name.
pub async fn list_installed_skills(scope: Scope, ctx: &WorkContext) -> Vec<InstalledSkill> {
    let mut order: Vec<String> = Vec::new();
    let mut merged: HashMap<String, InstalledSkill> = HashMap::new();

    for (name, description, path) in scan_skill_dirs(&ctx.canonical_skills_dir(scope)).await {
        let key = name.to_lowercase();
        if !merged.contains_key(&key) {
            order.push(key.clone());
            merged.insert(key, InstalledSkill {
                name,
                description,
                path,
                scope,
                agents: Vec::new(),
            });
        }
    }

    for agent in AgentKind::ALL.iter().copied() {
        // The shared directory doubles as some agents' skills dir; do not
        // scan it twice.
        let Some(dir) = agent.skills_dir(scope, ctx) else {
            continue;
        };
        if dir == ctx.canonical_skills_dir(scope) {
            for key in merged.keys().cloned().collect::<Vec<_>>() {
                if let Some(skill) = merged.get_mut(&key) {
                    if !skill.agents.contains(&agent) && skill.path.starts_with(&dir) {
                        skill.agents.push(agent);
                    }
                }
            }
            continue;
        }
        for (name, description, path) in scan_skill_dirs(&dir).await {
            let key = name.to_lowercase();
            match merged.get_mut(&key) {
                Some(skill) => {
                    if !skill.agents.contains(&agent) {
                        skill.agents.push(agent);
                    }
                },
                None => {
                    order.push(key.clone());
                    merged.insert(key, InstalledSkill {
                        name,
                        description,
                        path,
                        scope,
                        agents: vec![agent],
                    });
                },
            }
        }
    }

    order
        .into_iter()
        .filter_map(|key| merged.remove(&key))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn write_skill(dir: &Path, name: &str, description: &str) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(
            dir.join(MARKER_FILE),
            format!("---\nname: {name}\ndescription: {description}\n---\nbody\n"),
        )
        .unwrap();
    }

    fn test_ctx() -> (TempDir, TempDir, WorkContext) {
        let project = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let ctx = WorkContext::new(project.path(), home.path());
        (project, home, ctx)
    }

    #[tokio::test]
    async fn merges_shared_and_agent_copies_by_name() {
        let (_p, _h, ctx) = test_ctx();
        write_skill(&ctx.cwd.join(".agents/skills/review"), "review", "shared copy");
        write_skill(&ctx.cwd.join(".claude/skills/review"), "Review", "claude copy");
        write_skill(&ctx.cwd.join(".cursor/skills/deploy"), "deploy", "cursor only");

        let skills = list_installed_skills(Scope::Project, &ctx).await;
        assert_eq!(skills.len(), 2);

        let review = skills.iter().find(|s| s.name == "review").unwrap();
        assert_eq!(review.description, "shared copy");
        assert!(review.path.starts_with(ctx.cwd.join(".agents/skills")));
        assert!(review.agents.contains(&AgentKind::ClaudeCode));
        // Amp shares the `.agents/skills` directory.
        assert!(review.agents.contains(&AgentKind::Amp));

        let deploy = skills.iter().find(|s| s.name == "deploy").unwrap();
        assert_eq!(deploy.agents, vec![AgentKind::Cursor]);
    }

    #[tokio::test]
    async fn global_scope_scans_home() {
        let (_p, _h, ctx) = test_ctx();
        write_skill(&ctx.home_dir.join(".claude/skills/globby"), "globby", "global");
        write_skill(&ctx.cwd.join(".claude/skills/local"), "local", "project");

        let skills = list_installed_skills(Scope::Global, &ctx).await;
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].name, "globby");
        assert_eq!(skills[0].scope, Scope::Global);
    }

    #[tokio::test]
    async fn empty_when_nothing_installed() {
        let (_p, _h, ctx) = test_ctx();
        assert!(list_installed_skills(Scope::Project, &ctx).await.is_empty());
    }

    #[tokio::test]
    async fn discover_install_list_round_trip() {
        use devkit_discovery::{DiscoverOptions, discover_skills};

        let source = tempfile::tempdir().unwrap();
        write_skill(&source.path().join("skills/git-helper"), "git-helper", "Runs git things");
        let (_p, _h, ctx) = test_ctx();

        let found = discover_skills(source.path(), None, DiscoverOptions::default()).await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "git-helper");

        crate::engine::install_skill(&found[0], AgentKind::ClaudeCode, Scope::Project, &ctx, None)
            .await
            .unwrap();

        let installed = list_installed_skills(Scope::Project, &ctx).await;
        assert_eq!(installed.len(), 1);
        assert_eq!(installed[0].name, "git-helper");
        assert_eq!(installed[0].agents, vec![AgentKind::ClaudeCode]);
    }
}
