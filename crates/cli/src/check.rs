use {
    clap::Args,
    devkit_common::{Scope, WorkContext},
    devkit_drift::{DriftReport, GithubClient, check_drift},
    devkit_lock::LockStore,
};

#[derive(Args)]
pub struct CheckArgs {
    /// Check the global scope instead of the project.
    #[arg(long)]
    global: bool,
}

pub async fn handle_check(args: CheckArgs) -> anyhow::Result<()> {
    let ctx = WorkContext::from_env()?;
    let scope = if args.global { Scope::Global } else { Scope::Project };

    let lock = LockStore::for_scope(scope, &ctx).read().await;
    if lock.assets.is_empty() {
        println!("No tracked assets in {scope} scope.");
        return Ok(());
    }

    let report = check_drift(&GithubClient::new(), &lock).await;
    print_report(&report);
    Ok(())
}

pub fn print_report(report: &DriftReport) {
    if report.outdated.is_empty() {
        println!("All trackable assets are up to date.");
    } else {
        println!("Outdated:");
        for asset in &report.outdated {
            println!(
                "  {}  {} → {}",
                asset.key,
                &asset.local_hash[..asset.local_hash.len().min(12)],
                &asset.remote_hash[..asset.remote_hash.len().min(12)]
            );
        }
    }

    println!(
        "\n{} up to date, {} outdated, {} skipped, {} errors",
        report.up_to_date.len(),
        report.outdated.len(),
        report.skipped.len(),
        report.errors.len()
    );
    for failure in &report.errors {
        eprintln!("  ! {}: {}", failure.key, failure.reason);
    }
}
