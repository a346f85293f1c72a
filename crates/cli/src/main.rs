mod add;
mod check;
mod create;
mod list;
mod remove;
mod update;

use {
    clap::{Parser, Subcommand},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "devkit", about = "devkit — skills, commands, and rules for AI coding agents", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Install assets from a repository or local path.
    Add(add::AddArgs),
    /// Scaffold a new skill, command, or rule in the current directory.
    Create(create::CreateArgs),
    /// List tracked and installed assets.
    List(list::ListArgs),
    /// Remove installed assets and their lock entries.
    Remove(remove::RemoveArgs),
    /// Check installed assets against their source repositories.
    Check(check::CheckArgs),
    /// Reinstall assets whose source has moved on.
    Update(update::UpdateArgs),
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    match cli.command {
        Commands::Add(args) => add::handle_add(args).await,
        Commands::Create(args) => create::handle_create(args).await,
        Commands::List(args) => list::handle_list(args).await,
        Commands::Remove(args) => remove::handle_remove(args).await,
        Commands::Check(args) => check::handle_check(args).await,
        Commands::Update(args) => update::handle_update(args).await,
    }
}
