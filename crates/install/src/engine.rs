use std::path::{Path, PathBuf};

use {
    devkit_agents::AgentKind,
    devkit_common::{Scope, WorkContext, paths::is_path_within},
    devkit_discovery::{FlatAsset, Skill},
    thiserror::Error,
};

use crate::sanitize::sanitize_name;

/// Files never copied into an installed skill.
const EXCLUDED_FILES: &[&str] = &["README.md", "metadata.json"];

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("{agent} does not support global installation")]
    GlobalUnsupported { agent: AgentKind },

    #[error("refusing to write outside {}: {}", base.display(), target.display())]
    Traversal { base: PathBuf, target: PathBuf },

    #[error("failed to {action} {}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn io_err(action: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> InstallError {
    let path = path.to_path_buf();
    move |source| InstallError::Io { action, path, source }
}

/// Skills base directory for an agent and scope. Global scope on an agent
/// with no global directory is an explicit error, never a silent fallback.
fn skills_base(agent: AgentKind, scope: Scope, ctx: &WorkContext) -> Result<PathBuf, InstallError> {
    agent
        .skills_dir(scope, ctx)
        .ok_or(InstallError::GlobalUnsupported { agent })
}

/// Join a sanitized name onto `base` and verify the result still lives
/// under `base` after lexical normalization.
fn contained_target(base: &Path, name: &str) -> Result<PathBuf, InstallError> {
    let target = base.join(name);
    if !is_path_within(base, &target) {
        return Err(InstallError::Traversal {
            base: base.to_path_buf(),
            target,
        });
    }
    Ok(target)
}

fn excluded(name: &str, is_dir: bool) -> bool {
    if name.starts_with('_') {
        return true;
    }
    if is_dir {
        name == ".git"
    } else {
        EXCLUDED_FILES.contains(&name)
    }
}

/// Recursive copy with the standard exclusions, iterative to avoid
/// recursive async.
async fn copy_skill_tree(src: &Path, dst: &Path) -> Result<(), InstallError> {
    let mut pending = vec![(src.to_path_buf(), dst.to_path_buf())];
    while let Some((from, to)) = pending.pop() {
        tokio::fs::create_dir_all(&to)
            .await
            .map_err(io_err("create directory", &to))?;
        let mut entries = tokio::fs::read_dir(&from)
            .await
            .map_err(io_err("read directory", &from))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(io_err("read directory", &from))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(io_err("inspect", &entry.path()))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if excluded(&name, file_type.is_dir()) {
                continue;
            }
            let to_child = to.join(&name);
            if file_type.is_dir() {
                pending.push((entry.path(), to_child));
            } else {
                tokio::fs::copy(entry.path(), &to_child)
                    .await
                    .map_err(io_err("copy", &entry.path()))?;
            }
        }
    }
    Ok(())
}

/// Install a skill into one agent's directory for a scope, returning the
/// installed path.
///
/// Reinstalling replaces the destination wholesale: it is removed and
/// rebuilt from the source, so stale files never survive an update. The
/// replacement is not atomic; a crash mid-copy leaves a partial install
/// that the next run repairs.
pub async fn install_skill(
    skill: &Skill,
    agent: AgentKind,
    scope: Scope,
    ctx: &WorkContext,
    name_override: Option<&str>,
) -> Result<PathBuf, InstallError> {
    let base = skills_base(agent, scope, ctx)?;
    let name = sanitize_name(name_override.unwrap_or(&skill.display_name()));
    let target = contained_target(&base, &name)?;

    if tokio::fs::try_exists(&target).await.unwrap_or(false) {
        tokio::fs::remove_dir_all(&target)
            .await
            .map_err(io_err("remove existing", &target))?;
    }
    copy_skill_tree(&skill.path, &target).await?;

    tracing::debug!(skill = %name, agent = %agent, %scope, path = %target.display(), "installed skill");
    Ok(target)
}

/// Whether a skill with this name is already installed for an agent.
/// Any precondition violation degrades to `false`.
#[must_use]
pub fn is_skill_installed(name: &str, agent: AgentKind, scope: Scope, ctx: &WorkContext) -> bool {
    let Ok(base) = skills_base(agent, scope, ctx) else {
        return false;
    };
    let Ok(target) = contained_target(&base, &sanitize_name(name)) else {
        return false;
    };
    target.is_dir()
}

/// Delete an installed skill directory. Returns whether it existed.
pub async fn remove_skill(
    name: &str,
    agent: AgentKind,
    scope: Scope,
    ctx: &WorkContext,
) -> Result<bool, InstallError> {
    let base = skills_base(agent, scope, ctx)?;
    let target = contained_target(&base, &sanitize_name(name))?;
    if !tokio::fs::try_exists(&target).await.unwrap_or(false) {
        return Ok(false);
    }
    tokio::fs::remove_dir_all(&target)
        .await
        .map_err(io_err("remove", &target))?;
    Ok(true)
}

/// Root configuration directory for an agent and scope: the parent of its
/// skills directory (`.claude` for `.claude/skills`). Commands and rules
/// live under this.
fn agent_root(agent: AgentKind, scope: Scope, ctx: &WorkContext) -> Result<PathBuf, InstallError> {
    let skills = skills_base(agent, scope, ctx)?;
    Ok(skills.parent().unwrap_or(&skills).to_path_buf())
}

async fn install_flat(
    asset: &FlatAsset,
    agent: AgentKind,
    scope: Scope,
    ctx: &WorkContext,
    subdir: &str,
    extension: &str,
) -> Result<PathBuf, InstallError> {
    let root = agent_root(agent, scope, ctx)?;
    let dir = root.join(subdir);
    let file_name = format!("{}.{extension}", sanitize_name(&asset.name));
    let target = contained_target(&dir, &file_name)?;

    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(io_err("create directory", &dir))?;
    tokio::fs::write(&target, &asset.content)
        .await
        .map_err(io_err("write", &target))?;
    Ok(target)
}

async fn remove_flat(
    name: &str,
    agent: AgentKind,
    scope: Scope,
    ctx: &WorkContext,
    subdir: &str,
    extension: &str,
) -> Result<bool, InstallError> {
    let root = agent_root(agent, scope, ctx)?;
    let dir = root.join(subdir);
    let file_name = format!("{}.{extension}", sanitize_name(name));
    let target = contained_target(&dir, &file_name)?;
    if !tokio::fs::try_exists(&target).await.unwrap_or(false) {
        return Ok(false);
    }
    tokio::fs::remove_file(&target)
        .await
        .map_err(io_err("remove", &target))?;
    Ok(true)
}

/// Write a command prompt to `<agent root>/<commands subdir>/<name>.md`.
pub async fn install_command(
    asset: &FlatAsset,
    agent: AgentKind,
    scope: Scope,
    ctx: &WorkContext,
) -> Result<PathBuf, InstallError> {
    let profile = agent.profile();
    install_flat(asset, agent, scope, ctx, profile.commands_subdir, "md").await
}

/// Write a rules document using the agent's rule file extension.
pub async fn install_rule(
    asset: &FlatAsset,
    agent: AgentKind,
    scope: Scope,
    ctx: &WorkContext,
) -> Result<PathBuf, InstallError> {
    let profile = agent.profile();
    install_flat(asset, agent, scope, ctx, profile.rules_subdir, profile.rule_extension).await
}

pub async fn remove_command(
    name: &str,
    agent: AgentKind,
    scope: Scope,
    ctx: &WorkContext,
) -> Result<bool, InstallError> {
    let profile = agent.profile();
    remove_flat(name, agent, scope, ctx, profile.commands_subdir, "md").await
}

pub async fn remove_rule(
    name: &str,
    agent: AgentKind,
    scope: Scope,
    ctx: &WorkContext,
) -> Result<bool, InstallError> {
    let profile = agent.profile();
    remove_flat(name, agent, scope, ctx, profile.rules_subdir, profile.rule_extension).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use {devkit_discovery::MARKER_FILE, tempfile::TempDir};

    use super::*;

    fn test_ctx() -> (TempDir, TempDir, WorkContext) {
        let project = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let ctx = WorkContext::new(project.path(), home.path());
        (project, home, ctx)
    }

    fn sample_skill(dir: &Path, name: &str) -> Skill {
        std::fs::create_dir_all(dir).unwrap();
        let content = format!("---\nname: {name}\ndescription: test\n---\nbody\n");
        std::fs::write(dir.join(MARKER_FILE), &content).unwrap();
        Skill {
            name: name.to_string(),
            description: "test".to_string(),
            path: dir.to_path_buf(),
            raw_content: content,
            metadata: None,
        }
    }

    #[tokio::test]
    async fn installs_into_agent_project_directory() {
        let src = tempfile::tempdir().unwrap();
        let (_p, _h, ctx) = test_ctx();
        let skill = sample_skill(&src.path().join("my-skill"), "my-skill");

        let path = install_skill(&skill, AgentKind::ClaudeCode, Scope::Project, &ctx, None)
            .await
            .unwrap();
        assert_eq!(path, ctx.cwd.join(".claude/skills/my-skill"));
        assert!(path.join(MARKER_FILE).is_file());
        assert!(is_skill_installed("my-skill", AgentKind::ClaudeCode, Scope::Project, &ctx));
    }

    #[tokio::test]
    async fn reinstall_replaces_stale_files() {
        let src = tempfile::tempdir().unwrap();
        let (_p, _h, ctx) = test_ctx();
        let skill = sample_skill(&src.path().join("s"), "s");

        let path = install_skill(&skill, AgentKind::Cursor, Scope::Project, &ctx, None)
            .await
            .unwrap();
        std::fs::write(path.join("stale.txt"), "old").unwrap();

        install_skill(&skill, AgentKind::Cursor, Scope::Project, &ctx, None)
            .await
            .unwrap();
        assert!(!path.join("stale.txt").exists());
        assert!(path.join(MARKER_FILE).is_file());
    }

    #[tokio::test]
    async fn copy_skips_excluded_entries() {
        let src = tempfile::tempdir().unwrap();
        let (_p, _h, ctx) = test_ctx();
        let dir = src.path().join("s");
        let skill = sample_skill(&dir, "s");
        std::fs::write(dir.join("README.md"), "readme").unwrap();
        std::fs::write(dir.join("metadata.json"), "{}").unwrap();
        std::fs::write(dir.join("_private.md"), "hidden").unwrap();
        std::fs::create_dir(dir.join(".git")).unwrap();
        std::fs::write(dir.join(".git/HEAD"), "ref").unwrap();
        std::fs::create_dir(dir.join("scripts")).unwrap();
        std::fs::write(dir.join("scripts/run.sh"), "#!/bin/sh").unwrap();

        let path = install_skill(&skill, AgentKind::Codex, Scope::Project, &ctx, None)
            .await
            .unwrap();
        assert!(path.join(MARKER_FILE).is_file());
        assert!(path.join("scripts/run.sh").is_file());
        assert!(!path.join("README.md").exists());
        assert!(!path.join("metadata.json").exists());
        assert!(!path.join("_private.md").exists());
        assert!(!path.join(".git").exists());
    }

    #[tokio::test]
    async fn hostile_names_stay_inside_the_base_dir() {
        let src = tempfile::tempdir().unwrap();
        let (_p, _h, ctx) = test_ctx();
        let skill = sample_skill(&src.path().join("s"), "s");

        let path = install_skill(
            &skill,
            AgentKind::ClaudeCode,
            Scope::Project,
            &ctx,
            Some("../../../etc/passwd"),
        )
        .await
        .unwrap();
        // Sanitization strips the traversal; the result lands in the base.
        assert!(path.starts_with(ctx.cwd.join(".claude/skills")));
    }

    #[tokio::test]
    async fn global_scope_requires_a_global_directory() {
        let src = tempfile::tempdir().unwrap();
        let (_p, _h, ctx) = test_ctx();
        let skill = sample_skill(&src.path().join("s"), "s");

        let err = install_skill(&skill, AgentKind::GithubCopilot, Scope::Global, &ctx, None)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, InstallError::GlobalUnsupported { .. }));
        assert!(!is_skill_installed("s", AgentKind::GithubCopilot, Scope::Global, &ctx));
    }

    #[tokio::test]
    async fn global_install_resolves_against_home() {
        let src = tempfile::tempdir().unwrap();
        let (_p, _h, ctx) = test_ctx();
        let skill = sample_skill(&src.path().join("s"), "s");

        let path = install_skill(&skill, AgentKind::ClaudeCode, Scope::Global, &ctx, None)
            .await
            .unwrap();
        assert_eq!(path, ctx.home_dir.join(".claude/skills/s"));
    }

    #[tokio::test]
    async fn remove_skill_reports_existence() {
        let src = tempfile::tempdir().unwrap();
        let (_p, _h, ctx) = test_ctx();
        let skill = sample_skill(&src.path().join("s"), "s");

        install_skill(&skill, AgentKind::Amp, Scope::Project, &ctx, None)
            .await
            .unwrap();
        assert!(remove_skill("s", AgentKind::Amp, Scope::Project, &ctx).await.unwrap());
        assert!(!remove_skill("s", AgentKind::Amp, Scope::Project, &ctx).await.unwrap());
    }

    #[tokio::test]
    async fn commands_and_rules_use_profile_conventions() {
        let (_p, _h, ctx) = test_ctx();
        let asset = FlatAsset {
            name: "Review PR".to_string(),
            description: String::new(),
            path: PathBuf::from("/src/review.md"),
            content: "Do the review.".to_string(),
        };

        let cmd = install_command(&asset, AgentKind::ClaudeCode, Scope::Project, &ctx)
            .await
            .unwrap();
        assert_eq!(cmd, ctx.cwd.join(".claude/commands/review-pr.md"));

        // Cursor writes rules as .mdc; Opencode uses a singular command dir.
        let rule = install_rule(&asset, AgentKind::Cursor, Scope::Project, &ctx)
            .await
            .unwrap();
        assert_eq!(rule, ctx.cwd.join(".cursor/rules/review-pr.mdc"));

        let oc = install_command(&asset, AgentKind::Opencode, Scope::Project, &ctx)
            .await
            .unwrap();
        assert_eq!(oc, ctx.cwd.join(".opencode/command/review-pr.md"));

        assert!(remove_rule("Review PR", AgentKind::Cursor, Scope::Project, &ctx).await.unwrap());
        assert!(!rule.exists());
    }
}
