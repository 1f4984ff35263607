//! slugs: serve user/group memberships from a watched mapping file.

use clap::Parser;
use slugs::config::{self, Settings, DEFAULT_CONFIG_PATH};
use slugs::{server, FileWatcher, MembershipStore, Scheduler};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Parser)]
#[command(name = "slugs")]
#[command(version)]
#[command(about = "A simple, lightweight user group service", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    config::check_config_path(&cli.config)?;
    let settings = Settings::load(&cli.config)?;
    log::info!("Loaded configuration from {:?}", cli.config);

    let store = Arc::new(MembershipStore::new());
    let watcher = Arc::new(FileWatcher::new(
        &settings.data.user_group_mapping,
        store.updater(),
    )?);
    let scheduler = Arc::new(Scheduler::new(settings.data.poll_interval()));

    watcher.start(&scheduler);
    // Load the mapping before accepting requests.
    scheduler.tick();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let (shutdown_tx, shutdown_rx) = watch::channel(());

        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for shutdown signal: {}", e);
                return;
            }
            log::info!("Shutting down");
            let _ = shutdown_tx.send(());
        });

        let ticker = tokio::spawn(Arc::clone(&scheduler).run(shutdown_rx.clone()));
        let served = server::serve(&settings.server, Arc::clone(&store), shutdown_rx).await;

        ticker.abort();
        served
    })?;

    watcher.stop(&scheduler);
    Ok(())
}
