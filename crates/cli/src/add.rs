use std::{collections::HashMap, path::Path};

use {
    anyhow::{Context, bail},
    clap::Args,
    devkit_agents::AgentKind,
    devkit_common::{Scope, WorkContext},
    devkit_discovery::{
        DiscoverOptions, FlatAsset, INTERNAL_SKILLS_ENV, discover_commands, discover_rules,
        discover_skills, filter_skills,
    },
    devkit_drift::GithubClient,
    devkit_install::{install_command, install_rule, install_skill, sanitize_name},
    devkit_lock::{AssetType, LockEntry, LockStore, content_hash, lock_key},
    devkit_sources::{ParsedSource, SourceKind, cleanup_temp_dir, clone_repo, parse_source},
};

#[derive(Args)]
pub struct AddArgs {
    /// Asset type (skill, command, rule), or the source when omitted.
    type_or_source: String,

    /// Source: `owner/repo`, `owner/repo@skill`, a GitHub URL, a git URL,
    /// or a local path.
    source: Option<String>,

    /// Install under the home directory instead of the project.
    #[arg(long)]
    global: bool,

    /// Accept all defaults without prompting.
    #[arg(long, short = 'y')]
    yes: bool,

    /// Only install assets with these names.
    #[arg(long = "skill", value_delimiter = ',')]
    skills: Vec<String>,

    /// Install for these agents instead of the remembered selection.
    #[arg(long = "agent", value_delimiter = ',')]
    agents: Vec<String>,

    /// Install every discovered asset.
    #[arg(long)]
    all: bool,

    /// Show what the source provides without installing anything.
    #[arg(long)]
    list: bool,

    /// Keep searching subdirectories even after a direct match.
    #[arg(long)]
    full_depth: bool,
}

/// Resolved installation request, shared with `update`.
pub struct InstallOptions {
    /// Asset names to install; empty installs everything discovered.
    pub names: Vec<String>,
    pub agents: Vec<AgentKind>,
    pub include_internal: bool,
    pub full_depth: bool,
    pub list_only: bool,
}

pub async fn handle_add(args: AddArgs) -> anyhow::Result<()> {
    let ctx = WorkContext::from_env()?;
    let scope = if args.global { Scope::Global } else { Scope::Project };
    let (asset_type, source) = split_type_and_source(args.type_or_source, args.source)?;

    if asset_type == AssetType::Mcp {
        bail!("mcp configs are tracked in the lock file, but `add mcp` is not supported");
    }

    let agents = select_agents(&args.agents, scope, &ctx).await?;

    // There is no interactive prompt; without a selection everything found
    // gets installed, which --all/--yes merely make explicit.
    if !args.list && !args.all && !args.yes && args.skills.is_empty() {
        println!("No selection given; installing every discovered asset (use --skill to narrow).");
    }

    let opts = InstallOptions {
        names: args.skills,
        agents,
        include_internal: internal_opt_in(),
        full_depth: args.full_depth,
        list_only: args.list,
    };

    let installed = install_from_source(&ctx, scope, asset_type, &source, &opts).await?;

    if !opts.list_only {
        let store = LockStore::for_scope(scope, &ctx);
        let names: Vec<String> = opts.agents.iter().map(|a| a.as_str().to_string()).collect();
        store.save_selected_agents(&names).await?;
        println!("Installed {installed} asset(s) for {} agent(s).", opts.agents.len());
    }
    Ok(())
}

/// `add [TYPE] SOURCE`: when only one positional is given it is the source
/// and the type defaults to skill.
fn split_type_and_source(
    first: String,
    second: Option<String>,
) -> anyhow::Result<(AssetType, String)> {
    match second {
        Some(source) => Ok((first.parse()?, source)),
        None => Ok((AssetType::Skill, first)),
    }
}

fn internal_opt_in() -> bool {
    std::env::var(INTERNAL_SKILLS_ENV)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Agents to install for: explicit flags, then the remembered selection,
/// then whichever agents look present, then Claude Code.
pub async fn select_agents(
    requested: &[String],
    scope: Scope,
    ctx: &WorkContext,
) -> anyhow::Result<Vec<AgentKind>> {
    if !requested.is_empty() {
        return requested
            .iter()
            .map(|name| name.parse::<AgentKind>().map_err(anyhow::Error::from))
            .collect();
    }

    if let Some(saved) = LockStore::for_scope(scope, ctx).last_selected_agents().await {
        let parsed: Vec<AgentKind> = saved.iter().filter_map(|name| name.parse().ok()).collect();
        if !parsed.is_empty() {
            return Ok(parsed);
        }
    }

    let detected: Vec<AgentKind> = AgentKind::ALL
        .iter()
        .copied()
        .filter(|agent| agent.detected(ctx))
        .collect();
    if !detected.is_empty() {
        return Ok(detected);
    }
    Ok(vec![AgentKind::ClaudeCode])
}

/// Resolve a source, fetch it if remote, and run the install pipeline.
/// Clone directories are cleaned up whether the pipeline succeeds or not.
pub async fn install_from_source(
    ctx: &WorkContext,
    scope: Scope,
    asset_type: AssetType,
    source: &str,
    opts: &InstallOptions,
) -> anyhow::Result<usize> {
    let parsed = parse_source(source, &ctx.cwd);
    tracing::debug!(%source, kind = %parsed.kind, "resolved source");

    if parsed.kind == SourceKind::Local {
        let base = parsed.local_path.clone().context("local source has no path")?;
        return install_from_dir(ctx, scope, asset_type, source, &parsed, &base, opts).await;
    }

    let clone_dir = clone_repo(&parsed.url, parsed.git_ref.as_deref()).await?;
    let result = install_from_dir(ctx, scope, asset_type, source, &parsed, &clone_dir, opts).await;
    if let Err(e) = cleanup_temp_dir(&clone_dir).await {
        tracing::warn!(%e, "could not clean up clone directory");
    }
    result
}

async fn install_from_dir(
    ctx: &WorkContext,
    scope: Scope,
    asset_type: AssetType,
    source: &str,
    parsed: &ParsedSource,
    base: &Path,
    opts: &InstallOptions,
) -> anyhow::Result<usize> {
    match asset_type {
        AssetType::Skill => install_skills(ctx, scope, source, parsed, base, opts).await,
        AssetType::Command | AssetType::Rule => {
            install_flat_assets(ctx, scope, asset_type, source, parsed, base, opts).await
        },
        AssetType::Mcp => bail!("mcp configs cannot be installed"),
    }
}

async fn install_skills(
    ctx: &WorkContext,
    scope: Scope,
    source: &str,
    parsed: &ParsedSource,
    base: &Path,
    opts: &InstallOptions,
) -> anyhow::Result<usize> {
    // Asking for a skill by name implies access to internal ones.
    let include_internal =
        opts.include_internal || parsed.skill_filter.is_some() || !opts.names.is_empty();
    let discover = DiscoverOptions {
        include_internal,
        full_depth: opts.full_depth,
    };
    let skills = discover_skills(base, parsed.subpath.as_deref(), discover).await;
    if skills.is_empty() {
        bail!("no skills found in {source}");
    }

    let mut wanted = opts.names.clone();
    if let Some(filter) = &parsed.skill_filter {
        wanted.push(filter.clone());
    }
    let selected = if wanted.is_empty() {
        skills
    } else {
        let filtered = filter_skills(&skills, &wanted);
        if filtered.is_empty() {
            bail!("no skill matching {wanted:?} found in {source}");
        }
        filtered
    };

    if opts.list_only {
        for skill in &selected {
            println!("  {} — {}", skill.display_name(), skill.description);
        }
        return Ok(0);
    }

    let folder_hashes = match parsed.kind {
        SourceKind::Github => github_folder_hashes(parsed).await,
        _ => None,
    };

    let store = LockStore::for_scope(scope, ctx);
    let mut installed = 0usize;
    for skill in &selected {
        let name = sanitize_name(&skill.display_name());
        for agent in &opts.agents {
            match install_skill(skill, *agent, scope, ctx, None).await {
                Ok(path) => {
                    installed += 1;
                    println!("  + {name} → {}", ctx.shorten_path(&path));
                },
                Err(e) => eprintln!("  ! {name} for {agent}: {e}"),
            }
        }

        let skill_path = repo_relative(base, &skill.path);
        let entry = LockEntry {
            asset_type: AssetType::Skill,
            source: source.to_string(),
            source_type: parsed.kind.into(),
            source_url: parsed.url.clone(),
            source_ref: parsed.git_ref.clone(),
            content_hash: content_hash(&skill.raw_content),
            skill_folder_hash: folder_hashes
                .as_ref()
                .zip(skill_path.as_ref())
                .and_then(|(hashes, path)| hashes.get(path).cloned()),
            skill_path,
            installed_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        store.upsert(&lock_key(AssetType::Skill, &name), entry).await?;
    }
    Ok(installed)
}

async fn install_flat_assets(
    ctx: &WorkContext,
    scope: Scope,
    asset_type: AssetType,
    source: &str,
    parsed: &ParsedSource,
    base: &Path,
    opts: &InstallOptions,
) -> anyhow::Result<usize> {
    let search = match parsed.subpath.as_deref() {
        Some(sub) => base.join(sub),
        None => base.to_path_buf(),
    };
    let assets = match asset_type {
        AssetType::Command => discover_commands(&search).await,
        AssetType::Rule => discover_rules(&search).await,
        _ => unreachable!("only flat asset types reach here"),
    };
    if assets.is_empty() {
        bail!("no {asset_type}s found in {source}");
    }

    let selected: Vec<&FlatAsset> = if opts.names.is_empty() {
        assets.iter().collect()
    } else {
        let matched: Vec<&FlatAsset> = assets
            .iter()
            .filter(|asset| opts.names.iter().any(|n| n.eq_ignore_ascii_case(&asset.name)))
            .collect();
        if matched.is_empty() {
            bail!("no {asset_type} matching {:?} found in {source}", opts.names);
        }
        matched
    };

    if opts.list_only {
        for asset in &selected {
            println!("  {} — {}", asset.name, asset.description);
        }
        return Ok(0);
    }

    let store = LockStore::for_scope(scope, ctx);
    let mut installed = 0usize;
    for asset in selected {
        let name = sanitize_name(&asset.name);
        for agent in &opts.agents {
            let result = match asset_type {
                AssetType::Command => install_command(asset, *agent, scope, ctx).await,
                _ => install_rule(asset, *agent, scope, ctx).await,
            };
            match result {
                Ok(path) => {
                    installed += 1;
                    println!("  + {name} → {}", ctx.shorten_path(&path));
                },
                Err(e) => eprintln!("  ! {name} for {agent}: {e}"),
            }
        }

        let entry = LockEntry {
            asset_type,
            source: source.to_string(),
            source_type: parsed.kind.into(),
            source_url: parsed.url.clone(),
            source_ref: parsed.git_ref.clone(),
            content_hash: content_hash(&asset.content),
            skill_folder_hash: None,
            skill_path: None,
            installed_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        store.upsert(&lock_key(asset_type, &name), entry).await?;
    }
    Ok(installed)
}

/// Repo-relative path of an asset directory, with forward slashes so it
/// matches GitHub tree listings.
fn repo_relative(base: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    let rel = rel.to_string_lossy().replace('\\', "/");
    (!rel.is_empty()).then_some(rel)
}

async fn github_folder_hashes(parsed: &ParsedSource) -> Option<HashMap<String, String>> {
    let owner_repo = parsed.owner_repo()?;
    let (owner, repo) = owner_repo.split_once('/')?;
    let git_ref = parsed.git_ref.as_deref().unwrap_or("HEAD");
    match GithubClient::new().fetch_folder_hashes(owner, repo, git_ref).await {
        Ok(hashes) => Some(hashes),
        Err(e) => {
            tracing::warn!(%e, "could not fetch folder hashes; drift tracking disabled for this install");
            None
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn single_positional_is_a_skill_source() {
        let (ty, source) = split_type_and_source("owner/repo".into(), None).unwrap();
        assert_eq!(ty, AssetType::Skill);
        assert_eq!(source, "owner/repo");
    }

    #[test]
    fn two_positionals_split_into_type_and_source() {
        let (ty, source) =
            split_type_and_source("command".into(), Some("owner/repo".into())).unwrap();
        assert_eq!(ty, AssetType::Command);
        assert_eq!(source, "owner/repo");
    }

    #[test]
    fn unknown_type_is_an_error() {
        assert!(split_type_and_source("widget".into(), Some("owner/repo".into())).is_err());
    }

    #[test]
    fn repo_relative_paths_use_forward_slashes() {
        let base = Path::new("/tmp/clone");
        assert_eq!(
            repo_relative(base, Path::new("/tmp/clone/skills/review")),
            Some("skills/review".to_string())
        );
        assert_eq!(repo_relative(base, Path::new("/tmp/clone")), None);
        assert_eq!(repo_relative(base, Path::new("/elsewhere/x")), None);
    }

    #[tokio::test]
    async fn explicit_agent_selection_parses_names() {
        let ctx = WorkContext::new("/nonexistent/p", "/nonexistent/h");
        let agents = select_agents(&["claude-code".into(), "cursor".into()], Scope::Project, &ctx)
            .await
            .unwrap();
        assert_eq!(agents, vec![AgentKind::ClaudeCode, AgentKind::Cursor]);

        assert!(select_agents(&["no-such-agent".into()], Scope::Project, &ctx).await.is_err());
    }

    #[tokio::test]
    async fn agent_selection_falls_back_to_default() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let ctx = WorkContext::new(tmp.path(), home.path());
        let agents = select_agents(&[], Scope::Project, &ctx).await.unwrap();
        assert_eq!(agents, vec![AgentKind::ClaudeCode]);
    }
}
