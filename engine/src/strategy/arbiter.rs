// Merges pattern, trend and level signals into a tentative decision.
use crate::models::{Decision, Signals, Trend};

/// Applies the two rule families in sequence; when both fire, the later
/// level-breakout rule overwrites the trend-following result.
pub fn decide(signals: &Signals) -> Decision {
    let mut decision = Decision::None;

    if let Some(trend_decision) = trend_following(signals) {
        decision = trend_decision;
    }
    if let Some(breakout_decision) = level_breakout(signals) {
        decision = breakout_decision;
    }
    decision
}

fn trend_following(signals: &Signals) -> Option<Decision> {
    match signals.trend.short_trend {
        Trend::Up if signals.pattern.is_bullish_continuation() => Some(Decision::Buy),
        Trend::Down if signals.pattern.is_bearish_continuation() => Some(Decision::Sell),
        _ => None,
    }
}

fn level_breakout(signals: &Signals) -> Option<Decision> {
    if !signals.volume_confirmed {
        return None;
    }
    let price = signals.current_price;
    let levels = &signals.levels;

    if signals.pattern.is_bullish_breakout() {
        let at_support = levels.nearest_support().is_some_and(|s| price <= s);
        if at_support || price >= levels.dynamic_support {
            return Some(Decision::Buy);
        }
    } else if signals.pattern.is_bearish_breakout() {
        let at_resistance = levels.nearest_resistance().is_some_and(|r| price >= r);
        if at_resistance || price <= levels.dynamic_resistance {
            return Some(Decision::Sell);
        }
    }
    None
}
