// Risk vetoes applied to the arbiter's tentative decision.
use serde::Serialize;
use std::fmt;

use crate::models::{Decision, Signals, Trend};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VetoReason {
    /// Indecision candle breaking a level without conviction.
    UnconfirmedBreakout,
    /// Trading against the overall market trend.
    CounterTrend,
    /// Fewer than two levels recorded on the side being traded.
    WeakLevel,
}

impl fmt::Display for VetoReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VetoReason::UnconfirmedBreakout => "breakout not confirmed with enough strength",
            VetoReason::CounterTrend => "trading against the overall market trend",
            VetoReason::WeakLevel => "level touched too few times",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskVerdict {
    pub decision: Decision,
    pub veto: Option<VetoReason>,
}

const MIN_LEVEL_TOUCHES: usize = 2;

/// Runs the vetoes in order; the first one that matches forces `Decision::None`.
pub fn review(tentative: Decision, signals: &Signals) -> RiskVerdict {
    match find_veto(tentative, signals) {
        Some(reason) => RiskVerdict { decision: Decision::None, veto: Some(reason) },
        None => RiskVerdict { decision: tentative, veto: None },
    }
}

fn find_veto(tentative: Decision, signals: &Signals) -> Option<VetoReason> {
    let price = signals.current_price;
    let levels = &signals.levels;
    let overall = signals.trend.overall_trend;

    match tentative {
        Decision::None => None,
        Decision::Buy => {
            if signals.pattern.is_indecision() && levels.nearest_resistance().is_some_and(|r| price > r) {
                Some(VetoReason::UnconfirmedBreakout)
            } else if overall == Trend::Down {
                Some(VetoReason::CounterTrend)
            } else if levels.supports.len() < MIN_LEVEL_TOUCHES {
                Some(VetoReason::WeakLevel)
            } else {
                None
            }
        }
        Decision::Sell => {
            if signals.pattern.is_indecision() && levels.nearest_support().is_some_and(|s| price < s) {
                Some(VetoReason::UnconfirmedBreakout)
            } else if overall == Trend::Up {
                Some(VetoReason::CounterTrend)
            } else if levels.resistances.len() < MIN_LEVEL_TOUCHES {
                Some(VetoReason::WeakLevel)
            } else {
                None
            }
        }
    }
}
