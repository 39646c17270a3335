// Support/resistance detection from close prices.
use crate::error::EngineError;
use crate::models::{CandleWindow, LevelSet};

/// Computes static pivot levels and dynamic window extrema.
///
/// A close is a support when it is strictly below both neighbouring closes and
/// a resistance when strictly above both; equal neighbours never form a pivot.
/// Window order does not matter for the pivot test, so the newest-first
/// layout is scanned as is.
pub fn analyze(window: &CandleWindow) -> Result<LevelSet, EngineError> {
    window.require("support/resistance analysis", 1)?;
    let closes: Vec<f64> = window.closes().collect();

    let mut supports = Vec::new();
    let mut resistances = Vec::new();
    for i in 1..closes.len().saturating_sub(1) {
        let (previous, current, next) = (closes[i - 1], closes[i], closes[i + 1]);
        if current < previous && current < next {
            supports.push(current);
        }
        if current > previous && current > next {
            resistances.push(current);
        }
    }

    supports.sort_by(f64::total_cmp);
    supports.dedup();
    resistances.sort_by(|a, b| b.total_cmp(a));
    resistances.dedup();

    let dynamic_support = closes.iter().copied().fold(f64::INFINITY, f64::min);
    let dynamic_resistance = closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Ok(LevelSet { supports, resistances, dynamic_support, dynamic_resistance })
}
