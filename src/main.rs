//! trasexp main entry point

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use trasexp_api::{start_server, AppState};
use trasexp_client::ApiClient;
use trasexp_config::Config;
use trasexp_core::{FileSessionStore, SessionHandle};

#[derive(Parser, Debug)]
#[command(name = "trasexp")]
#[command(version = "0.1.0")]
#[command(about = "Personal finance client serving dashboard and transaction views over a finance backend", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let loaded = Config::load_or_default(&args.config);
    let level = loaded
        .as_ref()
        .map(|config| config.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e.to_details());
            return Err(e).with_context(|| format!("Failed to load {}", args.config.display()));
        }
    };
    if args.config.exists() {
        log::info!("Config loaded from {}", args.config.display());
    } else {
        log::warn!("Config file {} not found, using defaults", args.config.display());
    }

    let runtime = Runtime::new()?;
    runtime.block_on(run(config))
}

async fn run(config: Config) -> anyhow::Result<()> {
    let store = Arc::new(FileSessionStore::new(config.session.path.clone()));
    let session = SessionHandle::open(store);
    match session.user() {
        Some(user) if session.is_authenticated() => log::info!("Resuming session for {}", user.email),
        _ => log::info!("No stored session, sign in through /api/auth/login"),
    }

    let client = ApiClient::new(&config, session.clone()).context("Failed to create backend client")?;
    let state = AppState::new(Arc::new(client), session, config);

    start_server(state).await.context("Server failed")?;
    Ok(())
}
