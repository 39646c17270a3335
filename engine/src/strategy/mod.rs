// Decision strategy: runs the analyzers over one window, arbitrates a
// tentative decision and passes it through the risk filter.
pub mod arbiter;
pub mod risk;

use serde::Serialize;

use crate::analysis::{levels, pattern, trend, volume};
use crate::error::EngineError;
use crate::models::{CandleWindow, Decision, FineSeries, Signals};
use risk::VetoReason;

/// Structured record of one decision cycle. The core never logs; callers
/// emit this record however they see fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    pub signals: Signals,
    pub tentative: Decision,
    pub decision: Decision,
    pub veto: Option<VetoReason>,
}

/// Evaluates one decision cycle.
///
/// Fails with `InsufficientDataError` when the window holds fewer than two
/// candles; checks needing deeper history degrade to neutral results instead.
pub fn evaluate(window: &CandleWindow, fine_series: &FineSeries) -> Result<CycleReport, EngineError> {
    // Volume confirmation enforces the two-candle floor for the whole cycle.
    let volume_confirmed = volume::confirm(window)?;
    let pattern = pattern::classify(window)?;
    let levels = levels::analyze(window)?;
    let trend = trend::analyze(window, fine_series);
    let current_price = window
        .current_price()
        .ok_or_else(|| EngineError::ProcessingError("window has no latest candle".to_string()))?;

    let signals = Signals { levels, trend, pattern, volume_confirmed, current_price };
    let tentative = arbiter::decide(&signals);
    let verdict = risk::review(tentative, &signals);

    Ok(CycleReport { signals, tentative, decision: verdict.decision, veto: verdict.veto })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::{body, fine, flat, window, with_volume};
    use crate::models::{Pattern, Trend};

    fn rising_fine_series() -> FineSeries {
        FineSeries::from_oldest_first(vec![fine(0, 1.19, 1.17), fine(1, 1.20, 1.18), fine(2, 1.21, 1.19)]).unwrap()
    }

    // Closes [1.20, 1.21, 1.22, 1.19, 1.23, 1.18], newest first, with a
    // bullish engulfing head.
    fn scenario_window() -> CandleWindow {
        window(vec![
            with_volume(body(1.18, 1.20), 300.0),
            with_volume(body(1.19, 1.21), 200.0),
            flat(1.22),
            flat(1.19),
            flat(1.23),
            flat(1.18),
        ])
    }

    #[test]
    fn test_trend_rule_buys_then_counter_trend_veto() {
        let report = evaluate(&scenario_window(), &rising_fine_series()).unwrap();
        assert_eq!(report.signals.pattern, Pattern::BullishEngulfing);
        assert_eq!(report.signals.trend.short_trend, Trend::Up);
        assert_eq!(report.tentative, Decision::Buy);
        // Oldest close 1.18 is below 1.21, so the overall trend is down.
        assert_eq!(report.signals.trend.overall_trend, Trend::Down);
        assert_eq!(report.decision, Decision::None);
        assert_eq!(report.veto, Some(VetoReason::CounterTrend));
    }

    #[test]
    fn test_buy_passes_risk_filter() {
        let w = window(vec![
            with_volume(body(1.18, 1.20), 300.0),
            with_volume(body(1.19, 1.21), 200.0),
            flat(1.15),
            flat(1.18),
            flat(1.14),
            flat(1.17),
            flat(1.25),
        ]);
        let report = evaluate(&w, &rising_fine_series()).unwrap();
        assert_eq!(report.signals.levels.supports, vec![1.14, 1.15]);
        assert_eq!(report.signals.trend.overall_trend, Trend::Up);
        assert!(report.signals.volume_confirmed);
        assert_eq!(report.signals.current_price, 1.20);
        assert_eq!(report.decision, Decision::Buy);
        assert_eq!(report.veto, None);
    }

    #[test]
    fn test_neutral_fine_series_gives_no_trade() {
        let report = evaluate(&scenario_window(), &FineSeries::default()).unwrap();
        assert_eq!(report.tentative, Decision::None);
        assert_eq!(report.decision, Decision::None);
        assert_eq!(report.veto, None);
    }

    #[test]
    fn test_single_candle_cycle_fails() {
        let err = evaluate(&window(vec![flat(1.2)]), &rising_fine_series()).unwrap_err();
        assert!(err.skips_cycle());
        assert!(err.to_string().contains("volume confirmation"));
    }

    #[test]
    fn test_two_candle_cycle_degrades_gracefully() {
        let w = window(vec![body(1.18, 1.20), body(1.19, 1.21)]);
        let report = evaluate(&w, &rising_fine_series()).unwrap();
        assert_eq!(report.signals.trend.overall_trend, Trend::Neutral);
        assert_eq!(report.tentative, Decision::Buy);
        // No pivots in a two-candle window.
        assert_eq!(report.veto, Some(VetoReason::WeakLevel));
    }

    #[test]
    fn test_report_serializes() {
        let report = evaluate(&scenario_window(), &rising_fine_series()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["tentative"], "buy");
        assert_eq!(json["decision"], "none");
        assert_eq!(json["veto"], "counter_trend");
        assert_eq!(json["signals"]["pattern"], "bullish_engulfing");
    }
}
