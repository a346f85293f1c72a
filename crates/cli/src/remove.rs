use {
    clap::Args,
    devkit_agents::AgentKind,
    devkit_common::{Scope, WorkContext},
    devkit_install::{remove_command, remove_rule, remove_skill, sanitize_name},
    devkit_lock::{AssetType, LockStore, lock_key},
};

#[derive(Args)]
pub struct RemoveArgs {
    /// Asset type (skill, command, rule, mcp).
    asset_type: String,

    /// Asset names to remove.
    #[arg(required = true)]
    names: Vec<String>,

    /// Remove from the global scope instead of the project.
    #[arg(long)]
    global: bool,

    /// Only remove from this agent's directories.
    #[arg(long)]
    agent: Option<String>,
}

pub async fn handle_remove(args: RemoveArgs) -> anyhow::Result<()> {
    let ctx = WorkContext::from_env()?;
    let scope = if args.global { Scope::Global } else { Scope::Project };
    let asset_type: AssetType = args.asset_type.parse()?;

    // Without an explicit agent, sweep every known agent directory so no
    // stray copy survives.
    let agents: Vec<AgentKind> = match args.agent.as_deref() {
        Some(name) => vec![name.parse()?],
        None => AgentKind::ALL.to_vec(),
    };

    let store = LockStore::for_scope(scope, &ctx);
    for raw_name in &args.names {
        let name = sanitize_name(raw_name);
        let mut removed_anywhere = false;

        for agent in &agents {
            let result = match asset_type {
                AssetType::Skill => remove_skill(&name, *agent, scope, &ctx).await,
                AssetType::Command => remove_command(&name, *agent, scope, &ctx).await,
                AssetType::Rule => remove_rule(&name, *agent, scope, &ctx).await,
                AssetType::Mcp => Ok(false),
            };
            match result {
                Ok(true) => removed_anywhere = true,
                Ok(false) => {},
                // Global scope on an agent without a global dir is expected
                // during a sweep.
                Err(e) if args.agent.is_none() => {
                    tracing::debug!(%agent, %e, "skipping agent during removal sweep");
                },
                Err(e) => return Err(e.into()),
            }
        }

        let unlocked = store.remove(&lock_key(asset_type, &name)).await?;
        if removed_anywhere || unlocked {
            println!("Removed {asset_type} {name}.");
        } else {
            println!("{asset_type} {name} was not installed.");
        }
    }
    Ok(())
}
