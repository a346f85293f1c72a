use {
    clap::Args,
    devkit_agents::AgentKind,
    devkit_common::{Scope, WorkContext},
    devkit_install::list_installed_skills,
    devkit_lock::{AssetType, LockStore},
};

#[derive(Args)]
pub struct ListArgs {
    /// Restrict to one asset type (skill, command, rule, mcp).
    asset_type: Option<String>,

    /// List the global scope instead of the project.
    #[arg(long)]
    global: bool,

    /// Only show assets installed for this agent.
    #[arg(long)]
    agent: Option<String>,
}

pub async fn handle_list(args: ListArgs) -> anyhow::Result<()> {
    let ctx = WorkContext::from_env()?;
    let scope = if args.global { Scope::Global } else { Scope::Project };
    let type_filter: Option<AssetType> = args.asset_type.as_deref().map(str::parse).transpose()?;
    let agent_filter: Option<AgentKind> = args.agent.as_deref().map(str::parse).transpose()?;

    let lock = LockStore::for_scope(scope, &ctx).read().await;
    let tracked: Vec<_> = lock
        .assets
        .iter()
        .filter(|(_, entry)| type_filter.is_none_or(|t| entry.asset_type == t))
        .collect();

    if tracked.is_empty() {
        println!("No tracked assets in {scope} scope.");
    } else {
        println!("Tracked assets ({scope}):");
        for (key, entry) in tracked {
            let git_ref = entry.source_ref.as_deref().unwrap_or("HEAD");
            println!("  {key}  {} [{}@{git_ref}]", entry.source, entry.source_type);
        }
    }

    // The lock only covers assets installed through `add`; the scan also
    // surfaces skills placed on disk by other means.
    if type_filter.is_none() || type_filter == Some(AssetType::Skill) {
        let skills = list_installed_skills(scope, &ctx).await;
        let skills: Vec<_> = skills
            .into_iter()
            .filter(|skill| {
                agent_filter.is_none_or(|agent| skill.agents.contains(&agent))
            })
            .collect();
        if !skills.is_empty() {
            println!("\nInstalled skills ({scope}):");
            for skill in skills {
                let agents: Vec<&str> = skill.agents.iter().map(|a| a.as_str()).collect();
                let suffix = if agents.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", agents.join(", "))
                };
                println!("  {} — {}{suffix}", skill.name, skill.description);
            }
        }
    }

    Ok(())
}
