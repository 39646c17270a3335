// Engine-side data models built on top of `shared::models::Candle`:
// the per-cycle candle containers and the signal values the analyzers produce.
pub mod candle;
pub mod signals;

pub use candle::{CandleWindow, FineSeries, DEFAULT_WINDOW_CAPACITY};
pub use signals::{Decision, LevelSet, Pattern, Signals, Trend, TrendSignal, WavePattern};
