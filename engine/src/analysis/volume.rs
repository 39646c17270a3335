use crate::error::EngineError;
use crate::models::CandleWindow;

/// True when the latest candle traded more volume than the one before it.
pub fn confirm(window: &CandleWindow) -> Result<bool, EngineError> {
    window.require("volume confirmation", 2)?;
    let candles = window.candles();
    Ok(candles[0].volume > candles[1].volume)
}
