// Candle analyzers. Each one is a pure function over an immutable
// `CandleWindow` (or the fine-grained `FineSeries`) and can run in any order.
pub mod levels;
pub mod pattern;
pub mod trend;
pub mod volume;
