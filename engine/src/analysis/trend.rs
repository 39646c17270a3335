// Trend classification: micro-trend from the fine series, overall trend and
// a coarse wave shape from the main window.
use crate::models::{CandleWindow, FineSeries, Trend, TrendSignal, WavePattern};

const OVERALL_TREND_SPAN: usize = 5;
const WAVE_SPAN: usize = 5;

pub fn analyze(window: &CandleWindow, fine_series: &FineSeries) -> TrendSignal {
    TrendSignal {
        short_trend: short_trend(fine_series),
        overall_trend: overall_trend(window),
        wave_pattern: wave_pattern(window),
    }
}

/// Compares the oldest and newest candle of the fine series (oldest-first).
/// Higher high and higher low is `Up`, lower high and lower low is `Down`.
pub fn short_trend(fine_series: &FineSeries) -> Trend {
    let (Some(first), Some(last)) = (fine_series.oldest(), fine_series.newest()) else {
        return Trend::Neutral;
    };
    if last.high > first.high && last.low > first.low {
        Trend::Up
    } else if last.high < first.high && last.low < first.low {
        Trend::Down
    } else {
        Trend::Neutral
    }
}

/// Compares the oldest close in the window with the close five positions from
/// the oldest end. `Neutral` for windows shorter than five candles.
pub fn overall_trend(window: &CandleWindow) -> Trend {
    let len = window.len();
    if len < OVERALL_TREND_SPAN {
        return Trend::Neutral;
    }
    let candles = window.candles();
    let oldest = candles[len - 1].close;
    let reference = candles[len - OVERALL_TREND_SPAN].close;
    if oldest > reference {
        Trend::Up
    } else if oldest < reference {
        Trend::Down
    } else {
        Trend::Neutral
    }
}

/// Five-point zig-zag over the newest closes c0..c4 (c0 newest).
pub fn wave_pattern(window: &CandleWindow) -> WavePattern {
    if window.len() < WAVE_SPAN {
        return WavePattern::None;
    }
    let c: Vec<f64> = window.closes().take(WAVE_SPAN).collect();
    if c[0] > c[1] && c[1] > c[2] && c[3] < c[2] && c[4] > c[3] {
        WavePattern::Impulsive
    } else if c[0] < c[1] && c[1] < c[2] && c[3] > c[2] && c[4] < c[3] {
        WavePattern::Corrective
    } else {
        WavePattern::None
    }
}
