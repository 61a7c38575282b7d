//! CashDash main entry point

use cashdash_api::{start_server, AppState};
use cashdash_config::Config;
use cashdash_core::Ledger;
use cashdash_store::{MemoryStore, RemoteStore, StoreRef};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "cashdash")]
#[command(version = "0.1.0")]
#[command(about = "A lightweight expense-tracking dashboard", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn build_store(config: &Config) -> Result<StoreRef, Box<dyn std::error::Error>> {
    if config.store.is_remote() {
        let store = RemoteStore::new(
            &config.store.url,
            &config.store.api_key,
            Duration::from_secs(config.store.timeout_secs),
        )?;
        log::info!("Using remote store at {}", config.store.url);
        Ok(Arc::new(store))
    } else {
        log::warn!("No store URL configured, transactions are kept in memory only");
        Ok(Arc::new(MemoryStore::new()))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = match Config::load_or_default(args.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.to_details());
            std::process::exit(1);
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str())).init();
    log::info!("Config loaded from {}", args.config.display());

    let rt = Runtime::new()?;
    rt.block_on(async {
        let store = build_store(&config)?;
        let mut ledger = Ledger::new(store, config.ui.locale);
        ledger.load().await;

        let state = AppState::new(config, ledger);
        start_server(state).await?;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
