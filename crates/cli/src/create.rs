use std::path::Path;

use {
    anyhow::bail,
    clap::Args,
    devkit_common::{WorkContext, paths::is_path_within},
    devkit_lock::AssetType,
};

#[derive(Args)]
pub struct CreateArgs {
    /// What to scaffold (skill, command, rule).
    asset_type: String,

    /// Name of the new asset.
    name: String,
}

pub async fn handle_create(args: CreateArgs) -> anyhow::Result<()> {
    let ctx = WorkContext::from_env()?;
    let asset_type: AssetType = args.asset_type.parse()?;

    match asset_type {
        AssetType::Skill => create_skill(&ctx, &args.name).await,
        AssetType::Command => create_command(&ctx, &args.name).await,
        AssetType::Rule => create_rule(&ctx, &args.name).await,
        AssetType::Mcp => bail!("mcp configs cannot be scaffolded"),
    }
}

/// Validate a scaffold name. Stricter than install-time sanitization: the
/// name becomes a brand-new path, so anything questionable is rejected
/// instead of rewritten.
fn scaffold_name(input: &str, kind: AssetType) -> anyhow::Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        bail!("{kind} name is required");
    }
    if trimmed.contains('/') || trimmed.contains('\\') || trimmed.contains("..") {
        bail!("invalid {kind} name {trimmed:?}: path separators are not allowed");
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        bail!("invalid {kind} name {trimmed:?}: use letters, numbers, and hyphens only");
    }
    Ok(trimmed.to_string())
}

fn ensure_within_cwd(ctx: &WorkContext, target: &Path) -> anyhow::Result<()> {
    if !is_path_within(&ctx.cwd, target) {
        bail!("refusing to create {} outside the current directory", target.display());
    }
    Ok(())
}

async fn create_skill(ctx: &WorkContext, name: &str) -> anyhow::Result<()> {
    let name = scaffold_name(name, AssetType::Skill)?;
    let dir = ctx.cwd.join(&name);
    ensure_within_cwd(ctx, &dir)?;
    if tokio::fs::try_exists(&dir).await.unwrap_or(false) {
        bail!("directory already exists: {name}");
    }

    let skill_md = format!(
        "---\n\
         name: {name}\n\
         description: TODO - describe what this skill does\n\
         ---\n\
         \n\
         # {name}\n\
         \n\
         TODO - Add your skill instructions here.\n\
         \n\
         This file will be included as context when an AI agent uses this skill.\n"
    );
    let readme_md = format!(
        "# {name}\n\
         \n\
         A skill for AI coding agents.\n\
         \n\
         ## Installation\n\
         \n\
         ```bash\n\
         devkit add skill ./{name}\n\
         ```\n\
         \n\
         ## Description\n\
         \n\
         TODO - Describe what this skill does and when agents should use it.\n"
    );

    tokio::fs::create_dir_all(&dir).await?;
    tokio::fs::write(dir.join("SKILL.md"), skill_md).await?;
    tokio::fs::write(dir.join("README.md"), readme_md).await?;

    println!("Created skill scaffold at {name}/");
    println!("  {name}/SKILL.md  - Skill instructions (edit this)");
    println!("  {name}/README.md - Documentation");
    println!("\nInstall locally: devkit add skill ./{name}");
    Ok(())
}

async fn create_flat(
    ctx: &WorkContext,
    name: &str,
    kind: AssetType,
    content: String,
) -> anyhow::Result<()> {
    let file = ctx.cwd.join(format!("{name}.md"));
    ensure_within_cwd(ctx, &file)?;
    if tokio::fs::try_exists(&file).await.unwrap_or(false) {
        bail!("file already exists: {name}.md");
    }
    tokio::fs::write(&file, content).await?;
    println!("Created {kind}: {name}.md");
    Ok(())
}

async fn create_command(ctx: &WorkContext, name: &str) -> anyhow::Result<()> {
    let name = scaffold_name(name, AssetType::Command)?;
    let content = format!(
        "---\n\
         description: TODO - describe what this command does\n\
         ---\n\
         \n\
         # /{name}\n\
         \n\
         TODO - Add your command instructions here.\n\
         \n\
         This command will be available as `/{name}` in supported AI agents.\n"
    );
    create_flat(ctx, &name, AssetType::Command, content).await
}

async fn create_rule(ctx: &WorkContext, name: &str) -> anyhow::Result<()> {
    let name = scaffold_name(name, AssetType::Rule)?;
    let content = format!(
        "---\n\
         description: TODO - describe what this rule enforces\n\
         ---\n\
         \n\
         # {name}\n\
         \n\
         TODO - Add your rule content here.\n\
         \n\
         This rule will be included in the agent's context to guide its behavior.\n"
    );
    create_flat(ctx, &name, AssetType::Rule, content).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use {devkit_discovery::frontmatter::parse_marker, tempfile::TempDir};

    use super::*;

    fn test_ctx() -> (TempDir, TempDir, WorkContext) {
        let project = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let ctx = WorkContext::new(project.path(), home.path());
        (project, home, ctx)
    }

    #[test]
    fn scaffold_name_accepts_simple_names() {
        assert_eq!(scaffold_name("my-skill", AssetType::Skill).unwrap(), "my-skill");
        assert_eq!(scaffold_name("  Review2  ", AssetType::Rule).unwrap(), "Review2");
    }

    #[test]
    fn scaffold_name_rejects_separators_and_traversal() {
        for bad in ["", "   ", "a/b", "a\\b", "..", "sneaky..name", "has space", "dot.md"] {
            assert!(scaffold_name(bad, AssetType::Skill).is_err(), "{bad:?}");
        }
    }

    #[tokio::test]
    async fn skill_scaffold_has_a_parseable_marker() {
        let (_p, _h, ctx) = test_ctx();
        create_skill(&ctx, "my-skill").await.unwrap();

        let marker_path = ctx.cwd.join("my-skill/SKILL.md");
        let marker = parse_marker(&std::fs::read_to_string(&marker_path).unwrap()).unwrap();
        assert_eq!(marker.name, "my-skill");
        assert!(ctx.cwd.join("my-skill/README.md").is_file());
    }

    #[tokio::test]
    async fn refuses_to_overwrite_existing_scaffold() {
        let (_p, _h, ctx) = test_ctx();
        create_skill(&ctx, "dup").await.unwrap();
        assert!(create_skill(&ctx, "dup").await.is_err());

        create_command(&ctx, "deploy").await.unwrap();
        assert!(create_command(&ctx, "deploy").await.is_err());
    }

    #[tokio::test]
    async fn command_and_rule_scaffolds_are_flat_markdown() {
        let (_p, _h, ctx) = test_ctx();
        create_command(&ctx, "deploy").await.unwrap();
        create_rule(&ctx, "style").await.unwrap();

        let cmd = std::fs::read_to_string(ctx.cwd.join("deploy.md")).unwrap();
        assert!(cmd.contains("/deploy"));
        let rule = std::fs::read_to_string(ctx.cwd.join("style.md")).unwrap();
        assert!(rule.starts_with("---\ndescription:"));
    }
}
