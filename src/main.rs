// src/main.rs
//! AquaLux Spa API entry point: the HTTP server plus account provisioning commands.
use anyhow::{Context, Result};
use aqualux_spa::models::normalize_email;
use aqualux_spa::storage::{AccountStore, SqliteStorage};
use aqualux_spa::{AppConfig, SpaServer};
use clap::{ArgAction, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "aqualux-spa")]
#[command(about = "AquaLux Spa booking API")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server (default)
    Serve {
        /// Port to bind, overrides PORT and the config file
        #[arg(long)]
        port: Option<u16>,
    },
    /// Grant (or with --revoke, remove) administrator rights
    Promote {
        #[arg(long)]
        email: String,
        #[arg(long)]
        revoke: bool,
    },
    /// Activate or deactivate an account
    SetActive {
        #[arg(long)]
        email: String,
        #[arg(long, action = ArgAction::Set)]
        active: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging()?;

    let mut config = AppConfig::load().context("failed to load configuration")?;

    match args.command {
        None => serve(config).await,
        Some(Commands::Serve { port }) => {
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
        Some(Commands::Promote { email, revoke }) => {
            set_flags(&config, &email, Some(!revoke), None).await
        }
        Some(Commands::SetActive { email, active }) => {
            set_flags(&config, &email, None, Some(active)).await
        }
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    info!("Starting AquaLux Spa API v{}", env!("CARGO_PKG_VERSION"));
    let server = SpaServer::new(config).await?;
    server.start().await
}

async fn set_flags(
    config: &AppConfig,
    email: &str,
    is_admin: Option<bool>,
    is_active: Option<bool>,
) -> Result<()> {
    let storage = SqliteStorage::connect(&config.database.url, 1)
        .await
        .context("failed to open database")?;

    let email = normalize_email(email);
    let account = storage
        .set_flags(&email, is_admin, is_active)
        .await?
        .with_context(|| format!("no account registered with {email}"))?;

    println!(
        "{} (id {}): admin={} active={}",
        account.email, account.id, account.is_admin, account.is_active
    );
    Ok(())
}

const DEFAULT_LOG_FILTER: &str = "info,tower_http=info,sqlx=warn";

fn init_logging() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing::subscriber::set_global_default(build_subscriber(filter))?;
    Ok(())
}

fn build_subscriber(filter: EnvFilter) -> impl tracing::Subscriber + Send + Sync {
    FmtSubscriber::builder().with_env_filter(filter).finish()
}
