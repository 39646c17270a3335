// Candlestick pattern recognition over the three most recent candles.
use shared::models::Candle;

use crate::error::EngineError;
use crate::models::{CandleWindow, Pattern};

const HAMMER_LOWER_SHADOW_FACTOR: f64 = 2.0;
const HAMMER_UPPER_SHADOW_FACTOR: f64 = 0.5;
const DOJI_BODY_RATIO: f64 = 0.1;
const SPINNING_TOP_BODY_RATIO: f64 = 0.3;

/// Classifies the head of the window into a single [`Pattern`].
///
/// Checks run in a fixed priority order and the first one satisfied wins:
/// hammer, bullish engulfing, bearish engulfing, morning star, evening star,
/// three white soldiers, three black crows, doji, spinning top.
/// Needs at least two candles; the three-candle checks are skipped when the
/// window only holds two. Triangles span more than three candles and are
/// never reported here.
pub fn classify(window: &CandleWindow) -> Result<Pattern, EngineError> {
    window.require("pattern recognition", 2)?;
    let candles = window.candles();
    let last = &candles[0];
    let previous = &candles[1];

    if is_bullish_hammer(last) {
        return Ok(Pattern::BullishHammer);
    }
    if last.close > previous.open && last.open < previous.close {
        return Ok(Pattern::BullishEngulfing);
    }
    if last.close < previous.open && last.open > previous.close {
        return Ok(Pattern::BearishEngulfing);
    }

    if let Some(oldest) = candles.get(2) {
        if previous.is_bearish() && last.is_bullish() && oldest.is_bearish() {
            return Ok(Pattern::MorningStar);
        }
        if previous.is_bullish() && last.is_bearish() && oldest.is_bullish() {
            return Ok(Pattern::EveningStar);
        }
        if [oldest, previous, last].iter().all(|c| c.is_bullish())
            && oldest.close < previous.close
            && previous.close < last.close
        {
            return Ok(Pattern::ThreeWhiteSoldiers);
        }
        if [oldest, previous, last].iter().all(|c| c.is_bearish())
            && oldest.close > previous.close
            && previous.close > last.close
        {
            return Ok(Pattern::ThreeBlackCrows);
        }
    }

    if is_doji(last) {
        return Ok(Pattern::Doji);
    }
    if is_spinning_top(last) {
        return Ok(Pattern::SpinningTop);
    }
    Ok(Pattern::None)
}

fn is_bullish_hammer(candle: &Candle) -> bool {
    let body = candle.body();
    candle.lower_shadow() > body * HAMMER_LOWER_SHADOW_FACTOR
        && candle.upper_shadow() < body * HAMMER_UPPER_SHADOW_FACTOR
        && candle.is_bullish()
}

fn is_doji(candle: &Candle) -> bool {
    let range = candle.range();
    range > 0.0 && candle.body() <= range * DOJI_BODY_RATIO
}

fn is_spinning_top(candle: &Candle) -> bool {
    let range = candle.range();
    let body = candle.body();
    range > 0.0
        && body <= range * SPINNING_TOP_BODY_RATIO
        && candle.upper_shadow() > body
        && candle.lower_shadow() > body
}
