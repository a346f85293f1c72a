use {
    clap::Args,
    devkit_common::{Scope, WorkContext},
    devkit_drift::{GithubClient, check_drift},
    devkit_lock::LockStore,
};

use crate::add::{InstallOptions, install_from_source, select_agents};

#[derive(Args)]
pub struct UpdateArgs {
    /// Update the global scope instead of the project.
    #[arg(long)]
    global: bool,

    /// Accept all defaults without prompting.
    #[arg(long, short = 'y')]
    yes: bool,
}

pub async fn handle_update(args: UpdateArgs) -> anyhow::Result<()> {
    let ctx = WorkContext::from_env()?;
    let scope = if args.global { Scope::Global } else { Scope::Project };

    let lock = LockStore::for_scope(scope, &ctx).read().await;
    if lock.assets.is_empty() {
        println!("No tracked assets in {scope} scope.");
        return Ok(());
    }

    let report = check_drift(&GithubClient::new(), &lock).await;
    if report.outdated.is_empty() {
        println!("Everything is up to date.");
        return Ok(());
    }
    if !args.yes {
        println!("{} outdated asset(s) will be reinstalled.", report.outdated.len());
    }

    let agents = select_agents(&[], scope, &ctx).await?;
    let mut updated = 0usize;
    for asset in &report.outdated {
        // Reinstalling from the recorded source refreshes both the files
        // and the lock entry's hashes.
        let name = asset
            .key
            .split_once(':')
            .map_or(asset.key.as_str(), |(_, name)| name);
        println!("Updating {} from {}", asset.key, asset.entry.source);
        let opts = InstallOptions {
            names: vec![name.to_string()],
            agents: agents.clone(),
            include_internal: true,
            full_depth: false,
            list_only: false,
        };
        match install_from_source(&ctx, scope, asset.entry.asset_type, &asset.entry.source, &opts)
            .await
        {
            Ok(count) => updated += count,
            Err(e) => eprintln!("  ! {}: {e}", asset.key),
        }
    }

    println!("Updated {updated} installation(s) across {} asset(s).", report.outdated.len());
    Ok(())
}
