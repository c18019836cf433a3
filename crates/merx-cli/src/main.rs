use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use merx_application::ConsoleContext;
use merx_infrastructure::ConsolePaths;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

#[derive(Parser)]
#[command(name = "merx")]
#[command(about = "MERX operator console - session and merchant/model tooling", long_about = None)]
struct Cli {
    /// Config directory (defaults to $MERX_CONFIG_DIR or the platform config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current session state
    Status,
    /// Sign in with credentials or a federated identity token
    Login {
        #[arg(long, requires = "password", conflicts_with = "federated_token")]
        username: Option<String>,
        #[arg(long, requires = "username")]
        password: Option<String>,
        #[arg(long)]
        federated_token: Option<String>,
    },
    /// End the session
    Logout,
    /// Record a user activity signal (keeps the session alive)
    Touch {
        #[arg(long, default_value = "key_down")]
        signal: String,
    },
    /// List merchants across every cluster
    Merchants,
    /// Inspect the model hierarchy
    Models {
        #[command(subcommand)]
        action: ModelsAction,
    },
    /// Enforce the idle timeout until the session ends or Ctrl-C
    Watch,
}

#[derive(Subcommand)]
enum ModelsAction {
    /// Show a model with its knowledge bases and documents
    Show { id: String },
    /// List every knowledge base (creation-form picker)
    Picker,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "merx=info,liveness=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let paths = match cli.config_dir {
        Some(dir) => ConsolePaths::with_base(dir),
        None => ConsolePaths::new(),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(run(paths, cli.command))
}

async fn run(paths: ConsolePaths, command: Commands) -> Result<()> {
    let ctx = ConsoleContext::from_paths(paths)?;
    ctx.auth
        .bootstrap()
        .await
        .context("Failed to restore session")?;

    match command {
        Commands::Status => commands::session::status(&ctx).await,
        Commands::Login {
            username,
            password,
            federated_token,
        } => commands::session::login(&ctx, username, password, federated_token).await,
        Commands::Logout => commands::session::logout(&ctx).await,
        Commands::Touch { signal } => commands::session::touch(&ctx, &signal).await,
        Commands::Merchants => commands::merchants::list(&ctx).await,
        Commands::Models { action } => match action {
            ModelsAction::Show { id } => commands::models::show(&ctx, &id).await,
            ModelsAction::Picker => commands::models::picker(&ctx).await,
        },
        Commands::Watch => commands::watch::run(&ctx).await,
    }
}
