use anyhow::{Context, Result};
use nba_bet_tracker::config::Settings;
use nba_bet_tracker::data::load_snapshot;
use nba_bet_tracker::routes::{router, SharedStore};
use nba_bet_tracker::store::BetStore;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let settings = Settings::from_env();

    let mut store = BetStore::new();

    // Restore a previously exported ledger if one is configured
    let snapshot_file = std::env::var("SNAPSHOT_FILE").unwrap_or_default();
    if !snapshot_file.is_empty() && Path::new(&snapshot_file).exists() {
        let bets = load_snapshot(&snapshot_file)
            .with_context(|| format!("Failed to load snapshot from {}", snapshot_file))?;
        println!("Loaded {} bets from {}", bets.len(), snapshot_file);
        store.load(bets);
    }

    let shared: SharedStore = Arc::new(RwLock::new(store));
    let app = router(shared, &settings);

    println!(
        "\nStarting bets API at http://{}{}",
        settings.bind_addr(),
        settings.api_prefix
    );
    println!("Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(settings.bind_addr())
        .await
        .context("Failed to bind server address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
