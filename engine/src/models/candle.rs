// Per-cycle candle containers.
//
// The two containers deliberately use opposite orderings: the analysis window
// is newest-first, while the fine-grained short-trend series arrives
// oldest-first from its feed and is kept that way.
use shared::models::Candle;

use crate::error::EngineError;

pub const DEFAULT_WINDOW_CAPACITY: usize = 80;

fn validate(candles: &[Candle]) -> Result<(), EngineError> {
    for (index, candle) in candles.iter().enumerate() {
        candle
            .check_invariant()
            .map_err(|reason| EngineError::MalformedCandleError { index, reason })?;
    }
    Ok(())
}

/// Immutable snapshot of the most recent candles for one decision cycle.
///
/// Index 0 is the most recent candle; increasing indices go further into the
/// past. At most `capacity` candles are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleWindow {
    candles: Vec<Candle>,
}

impl CandleWindow {
    /// Builds a window from candles already ordered newest-first, keeping only
    /// the `capacity` most recent ones. Every retained candle is validated.
    pub fn from_newest_first(mut candles: Vec<Candle>, capacity: usize) -> Result<Self, EngineError> {
        candles.truncate(capacity);
        validate(&candles)?;
        Ok(CandleWindow { candles })
    }

    /// Same as [`CandleWindow::from_newest_first`] for candles in chronological order.
    pub fn from_oldest_first(mut candles: Vec<Candle>, capacity: usize) -> Result<Self, EngineError> {
        candles.reverse();
        Self::from_newest_first(candles, capacity)
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Candle> {
        self.candles.get(index)
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn latest(&self) -> Option<&Candle> {
        self.candles.first()
    }

    /// Close of the most recent candle.
    pub fn current_price(&self) -> Option<f64> {
        self.latest().map(|c| c.close)
    }

    /// Closes in window order (newest first).
    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.candles.iter().map(|c| c.close)
    }

    pub fn require(&self, check: &'static str, required: usize) -> Result<(), EngineError> {
        if self.candles.len() < required {
            return Err(EngineError::insufficient(check, required, self.candles.len()));
        }
        Ok(())
    }
}

/// Finer-granularity companion series used by the short-trend check.
/// Index 0 is the OLDEST candle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FineSeries {
    candles: Vec<Candle>,
}

impl FineSeries {
    pub fn from_oldest_first(candles: Vec<Candle>) -> Result<Self, EngineError> {
        validate(&candles)?;
        Ok(FineSeries { candles })
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn oldest(&self) -> Option<&Candle> {
        self.candles.first()
    }

    pub fn newest(&self) -> Option<&Candle> {
        self.candles.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn candle_at(minute: i64, close: f64) -> Candle {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap() + Duration::minutes(minute);
        Candle::new(ts, close, close + 0.01, close - 0.01, close, 10.0)
    }

    #[test]
    fn test_window_keeps_most_recent_candles() {
        let newest_first: Vec<Candle> = (0..100).rev().map(|m| candle_at(m, 1.0 + m as f64 / 100.0)).collect();
        let window = CandleWindow::from_newest_first(newest_first, DEFAULT_WINDOW_CAPACITY).unwrap();
        assert_eq!(window.len(), 80);
        assert_eq!(window.latest().unwrap().timestamp, candle_at(99, 0.0).timestamp);
        assert_eq!(window.get(79).unwrap().timestamp, candle_at(20, 0.0).timestamp);
    }

    #[test]
    fn test_window_from_oldest_first_reverses() {
        let chronological = vec![candle_at(0, 1.0), candle_at(1, 1.1), candle_at(2, 1.2)];
        let window = CandleWindow::from_oldest_first(chronological, 2).unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(window.current_price(), Some(1.2));
        assert_eq!(window.closes().collect::<Vec<_>>(), vec![1.2, 1.1]);
    }

    #[test]
    fn test_window_rejects_malformed_candle() {
        let mut bad = candle_at(1, 1.1);
        bad.high = 1.0;
        let result = CandleWindow::from_newest_first(vec![candle_at(2, 1.2), bad], 80);
        match result {
            Err(EngineError::MalformedCandleError { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected malformed candle error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_candle_beyond_capacity_is_ignored() {
        let mut bad = candle_at(0, 1.0);
        bad.low = 2.0;
        let window = CandleWindow::from_newest_first(vec![candle_at(1, 1.1), bad], 1).unwrap();
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn test_require_reports_counts() {
        let window = CandleWindow::from_newest_first(vec![candle_at(0, 1.0)], 80).unwrap();
        match window.require("engulfing", 2) {
            Err(EngineError::InsufficientDataError { required, actual, .. }) => {
                assert_eq!((required, actual), (2, 1));
            }
            other => panic!("expected insufficient data, got {:?}", other),
        }
    }

    #[test]
    fn test_fine_series_keeps_feed_order() {
        let series = FineSeries::from_oldest_first(vec![candle_at(0, 1.0), candle_at(1, 1.5)]).unwrap();
        assert_eq!(series.oldest().unwrap().close, 1.0);
        assert_eq!(series.newest().unwrap().close, 1.5);
        assert!(FineSeries::default().is_empty());
    }
}
