use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV bar as delivered by a market-data feed.
///
/// The wire shape is `{open, high, low, close, volume}`; `timestamp` is optional
/// on the wire and defaults to the Unix epoch when a feed omits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    #[serde(default)]
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(timestamp: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Candle { timestamp, open, high, low, close, volume }
    }

    /// Size of the real body, `|close - open|`.
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Distance from the top of the body to the high.
    pub fn upper_shadow(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    /// Distance from the bottom of the body to the low.
    pub fn lower_shadow(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Checks `low <= min(open, close) <= max(open, close) <= high` plus finite
    /// prices and a finite, non-negative volume. Returns the violated rule.
    pub fn check_invariant(&self) -> Result<(), String> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite()) {
            return Err(format!(
                "non-finite price (open={}, high={}, low={}, close={})",
                self.open, self.high, self.low, self.close
            ));
        }
        if !self.volume.is_finite() || self.volume < 0.0 {
            return Err(format!("invalid volume {}", self.volume));
        }
        if self.low > self.open.min(self.close) {
            return Err(format!("low {} above body bottom {}", self.low, self.open.min(self.close)));
        }
        if self.high < self.open.max(self.close) {
            return Err(format!("high {} below body top {}", self.high, self.open.max(self.close)));
        }
        Ok(())
    }
}

/// Candle granularity. Feeds address granularities in seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TimeFrame {
    Second1,
    Minute1,
    Minute5,
    Minute15,
    Minute30,
    Hour1,
    Day1,
}

impl TimeFrame {
    pub fn from_seconds(seconds: u32) -> Option<TimeFrame> {
        match seconds {
            1 => Some(TimeFrame::Second1),
            60 => Some(TimeFrame::Minute1),
            300 => Some(TimeFrame::Minute5),
            900 => Some(TimeFrame::Minute15),
            1800 => Some(TimeFrame::Minute30),
            3600 => Some(TimeFrame::Hour1),
            86_400 => Some(TimeFrame::Day1),
            _ => None,
        }
    }

    pub fn as_seconds(&self) -> u32 {
        match self {
            TimeFrame::Second1 => 1,
            TimeFrame::Minute1 => 60,
            TimeFrame::Minute5 => 300,
            TimeFrame::Minute15 => 900,
            TimeFrame::Minute30 => 1800,
            TimeFrame::Hour1 => 3600,
            TimeFrame::Day1 => 86_400,
        }
    }
}
