use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::info;

use common::logger::init_logger;
use market::DexScreenerClient;
use store::SqliteSignalStore;
use tracker::{TrackerConfig, TrackerEngine, run_tracker};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger("trackerd");

    let cfg = TrackerConfig::from_env();

    let store = Arc::new(SqliteSignalStore::new(&cfg.database_url).await?);
    let market = Arc::new(DexScreenerClient::new(cfg.screener_base_url.clone())?);

    let (notify_tx, mut notify_rx) = mpsc::channel(cfg.notify_queue_capacity);

    // Drain notifications into the log until a delivery channel exists.
    tokio::spawn(async move {
        while let Some(note) = notify_rx.recv().await {
            info!(?note, "price update ready for delivery");
        }
    });

    let poll_every = Duration::from_secs(cfg.poll_interval_secs);
    let tracker = TrackerEngine::new(cfg, store, market, notify_tx);

    run_tracker(tracker, poll_every).await
}
