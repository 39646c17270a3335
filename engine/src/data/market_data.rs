// Manages market data and exposes it to the engine through `MarketDataProvider`.
use anyhow::Result;
use async_trait::async_trait;
use shared::models::{Candle, TimeFrame};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::EngineError;

/// Source of candles for the decision cycle.
///
/// The two feeds use different orderings: `fetch_window` returns candles
/// newest-first, `fetch_fine_series` returns them oldest-first.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn available_instruments(&self) -> Result<Vec<String>, EngineError>;

    async fn fetch_window(
        &self,
        instrument: &str,
        granularity_seconds: u32,
        count: usize,
    ) -> Result<Vec<Candle>, EngineError>;

    async fn fetch_fine_series(&self, instrument: &str) -> Result<Vec<Candle>, EngineError>;
}

/// In-memory candle history per instrument and timeframe.
pub struct MarketDataStore {
    data: HashMap<String, HashMap<TimeFrame, Vec<Candle>>>,
}

impl MarketDataStore {
    pub fn new() -> Self {
        MarketDataStore {
            data: HashMap::new(),
        }
    }

    pub fn add_candles(&mut self, instrument: &str, timeframe: TimeFrame, new_candles: Vec<Candle>) -> Result<()> {
        let instrument_data = self.data.entry(instrument.to_string()).or_default();
        let timeframe_data = instrument_data.entry(timeframe).or_default();

        // Later inserts win on duplicate timestamps.
        timeframe_data.extend(new_candles);
        timeframe_data.reverse();
        timeframe_data.sort_by_key(|c| c.timestamp);
        timeframe_data.dedup_by_key(|c| c.timestamp);

        Ok(())
    }

    /// Most recent `count` candles in chronological order.
    pub fn latest_candles(&self, instrument: &str, timeframe: TimeFrame, count: usize) -> Option<Vec<Candle>> {
        self.data
            .get(instrument)
            .and_then(|instrument_data| instrument_data.get(&timeframe))
            .map(|candles| {
                let start = candles.len().saturating_sub(count);
                candles[start..].to_vec()
            })
    }

    pub fn instruments(&self) -> Vec<String> {
        let mut instruments: Vec<String> = self.data.keys().cloned().collect();
        instruments.sort();
        instruments
    }
}

impl Default for MarketDataStore {
    fn default() -> Self {
        Self::new()
    }
}

/// `MarketDataProvider` over a shared `MarketDataStore`.
pub struct StoreFeed {
    store: Arc<RwLock<MarketDataStore>>,
    fine_timeframe: TimeFrame,
    fine_count: usize,
}

impl StoreFeed {
    pub fn new(store: Arc<RwLock<MarketDataStore>>, fine_granularity_seconds: u32, fine_count: usize) -> Result<Self, EngineError> {
        let fine_timeframe = timeframe_for(fine_granularity_seconds)?;
        Ok(StoreFeed { store, fine_timeframe, fine_count })
    }

    async fn latest(&self, instrument: &str, timeframe: TimeFrame, count: usize) -> Result<Vec<Candle>, EngineError> {
        let store = self.store.read().await;
        store.latest_candles(instrument, timeframe, count).ok_or_else(|| {
            EngineError::MarketDataError(format!(
                "Market data not found for instrument '{}' at {}s granularity",
                instrument,
                timeframe.as_seconds()
            ))
        })
    }
}

#[async_trait]
impl MarketDataProvider for StoreFeed {
    async fn available_instruments(&self) -> Result<Vec<String>, EngineError> {
        Ok(self.store.read().await.instruments())
    }

    async fn fetch_window(
        &self,
        instrument: &str,
        granularity_seconds: u32,
        count: usize,
    ) -> Result<Vec<Candle>, EngineError> {
        let timeframe = timeframe_for(granularity_seconds)?;
        let mut candles = self.latest(instrument, timeframe, count).await?;
        candles.reverse();
        Ok(candles)
    }

    async fn fetch_fine_series(&self, instrument: &str) -> Result<Vec<Candle>, EngineError> {
        self.latest(instrument, self.fine_timeframe, self.fine_count).await
    }
}

pub fn timeframe_for(granularity_seconds: u32) -> Result<TimeFrame, EngineError> {
    TimeFrame::from_seconds(granularity_seconds)
        .ok_or_else(|| EngineError::ConfigError(format!("Unsupported granularity: {} seconds", granularity_seconds)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn candle(step: i64, close: f64) -> Candle {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::minutes(step);
        Candle::new(ts, close, close, close, close, 10.0)
    }

    #[test]
    fn test_add_candles_sorts_and_dedups() {
        let mut store = MarketDataStore::new();
        store.add_candles("EURUSD", TimeFrame::Minute1, vec![candle(2, 1.2), candle(0, 1.0)]).unwrap();
        store.add_candles("EURUSD", TimeFrame::Minute1, vec![candle(1, 1.1), candle(2, 1.25)]).unwrap();
        let candles = store.latest_candles("EURUSD", TimeFrame::Minute1, 10).unwrap();
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        assert_eq!(closes, vec![1.0, 1.1, 1.25]);
    }

    #[test]
    fn test_latest_candles_limits_count() {
        let mut store = MarketDataStore::new();
        store.add_candles("EURUSD", TimeFrame::Minute1, (0..5).map(|i| candle(i, i as f64)).collect()).unwrap();
        let candles = store.latest_candles("EURUSD", TimeFrame::Minute1, 2).unwrap();
        assert_eq!(candles.iter().map(|c| c.close).collect::<Vec<_>>(), vec![3.0, 4.0]);
        assert!(store.latest_candles("EURUSD", TimeFrame::Second1, 2).is_none());
        assert!(store.latest_candles("GBPUSD", TimeFrame::Minute1, 2).is_none());
    }

    #[tokio::test]
    async fn test_store_feed_orderings() {
        let mut store = MarketDataStore::new();
        store.add_candles("EURUSD", TimeFrame::Minute1, (0..4).map(|i| candle(i, i as f64)).collect()).unwrap();
        store.add_candles("EURUSD", TimeFrame::Second1, (0..4).map(|i| candle(i, 10.0 + i as f64)).collect()).unwrap();
        let feed = StoreFeed::new(Arc::new(RwLock::new(store)), 1, 3).unwrap();

        let window = feed.fetch_window("EURUSD", 60, 3).await.unwrap();
        assert_eq!(window.iter().map(|c| c.close).collect::<Vec<_>>(), vec![3.0, 2.0, 1.0]);

        let fine = feed.fetch_fine_series("EURUSD").await.unwrap();
        assert_eq!(fine.iter().map(|c| c.close).collect::<Vec<_>>(), vec![11.0, 12.0, 13.0]);

        assert_eq!(feed.available_instruments().await.unwrap(), vec!["EURUSD".to_string()]);
    }

    #[tokio::test]
    async fn test_store_feed_errors() {
        let feed = StoreFeed::new(Arc::new(RwLock::new(MarketDataStore::new())), 1, 30).unwrap();
        let missing = feed.fetch_window("EURUSD", 60, 15).await.unwrap_err();
        assert!(matches!(missing, EngineError::MarketDataError(ref msg) if msg.contains("not found")));
        assert_eq!(
            missing.to_string(),
            "Market data error: Market data not found for instrument 'EURUSD' at 60s granularity"
        );
        let unsupported = feed.fetch_window("EURUSD", 7, 15).await.unwrap_err();
        assert!(matches!(unsupported, EngineError::ConfigError(_)));
        assert!(StoreFeed::new(Arc::new(RwLock::new(MarketDataStore::new())), 2, 30).is_err());
    }
}
