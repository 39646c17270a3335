// Engine main entry point
use decision_engine::config::settings::EngineSettings;
use decision_engine::data::csv_parser::CandleCsvLoader;
use decision_engine::data::market_data::{timeframe_for, MarketDataStore, StoreFeed};
use decision_engine::services::{Session, SimulatedVenue};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::{info, warn};

const CONFIG_ENV: &str = "DECISION_ENGINE_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    info!("Starting Decision Engine...");

    let settings = match std::env::var(CONFIG_ENV) {
        Ok(path) => {
            info!(path = %path, "Loading settings");
            EngineSettings::load_from_file(&path)?
        }
        Err(_) => EngineSettings::load_default()?,
    };

    let mut store = MarketDataStore::new();
    for file in &settings.data_files {
        let candles = CandleCsvLoader::load_candles_from_csv(&file.path)?;
        info!(instrument = %file.instrument, path = %file.path, count = candles.len(), "Loaded candles");
        store.add_candles(&file.instrument, timeframe_for(file.granularity_seconds)?, candles)?;
    }
    if settings.data_files.is_empty() {
        warn!("No data files configured; every cycle will be skipped for lack of candles");
    }

    let feed = StoreFeed::new(
        Arc::new(RwLock::new(store)),
        settings.fine_series.granularity_seconds,
        settings.fine_series.count,
    )?;
    let venue = SimulatedVenue::new(settings.session.min_stake);
    let session = Session::new(feed, venue, settings);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Bot stopped by user, finishing current cycle");
            let _ = shutdown_tx.send(true);
        }
    });

    let summary = session.run(shutdown_rx).await?;
    info!(
        operations = summary.cycles,
        consecutive_losses = summary.consecutive_losses,
        "Session ended"
    );
    Ok(())
}
