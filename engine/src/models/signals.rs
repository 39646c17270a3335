// Signal values produced by the analyzers and consumed by the arbiter and the
// risk filter.
use serde::Serialize;
use std::fmt;

/// Named candlestick pattern. At most one is reported per cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    BullishHammer,
    BullishEngulfing,
    MorningStar,
    ThreeWhiteSoldiers,
    AscendingTriangle,
    BearishEngulfing,
    EveningStar,
    ThreeBlackCrows,
    DescendingTriangle,
    Doji,
    SpinningTop,
    None,
}

impl Pattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pattern::BullishHammer => "bullish_hammer",
            Pattern::BullishEngulfing => "bullish_engulfing",
            Pattern::MorningStar => "morning_star",
            Pattern::ThreeWhiteSoldiers => "three_white_soldiers",
            Pattern::AscendingTriangle => "ascending_triangle",
            Pattern::BearishEngulfing => "bearish_engulfing",
            Pattern::EveningStar => "evening_star",
            Pattern::ThreeBlackCrows => "three_black_crows",
            Pattern::DescendingTriangle => "descending_triangle",
            Pattern::Doji => "doji",
            Pattern::SpinningTop => "spinning_top",
            Pattern::None => "none",
        }
    }

    /// Patterns the trend-following rule buys on.
    pub fn is_bullish_continuation(&self) -> bool {
        matches!(self, Pattern::BullishEngulfing | Pattern::MorningStar | Pattern::ThreeWhiteSoldiers)
    }

    /// Patterns the trend-following rule sells on.
    pub fn is_bearish_continuation(&self) -> bool {
        matches!(self, Pattern::BearishEngulfing | Pattern::EveningStar | Pattern::ThreeBlackCrows)
    }

    /// Patterns the level-breakout rule buys on. Note that bullish engulfing is
    /// not one of them.
    pub fn is_bullish_breakout(&self) -> bool {
        matches!(
            self,
            Pattern::BullishHammer | Pattern::MorningStar | Pattern::ThreeWhiteSoldiers | Pattern::AscendingTriangle
        )
    }

    /// Patterns the level-breakout rule sells on.
    pub fn is_bearish_breakout(&self) -> bool {
        matches!(
            self,
            Pattern::BearishEngulfing | Pattern::EveningStar | Pattern::ThreeBlackCrows | Pattern::DescendingTriangle
        )
    }

    /// Weak reversal candles that cannot carry a breakout on their own.
    pub fn is_indecision(&self) -> bool {
        matches!(self, Pattern::Doji | Pattern::SpinningTop)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Neutral => "neutral",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WavePattern {
    Impulsive,
    Corrective,
    None,
}

impl fmt::Display for WavePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WavePattern::Impulsive => "impulsive",
            WavePattern::Corrective => "corrective",
            WavePattern::None => "none",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendSignal {
    pub short_trend: Trend,
    pub overall_trend: Trend,
    pub wave_pattern: WavePattern,
}

/// Support/resistance levels for one window.
///
/// `supports` is ascending and `resistances` descending, both without
/// duplicates. The dynamic levels are the window's close extrema and are
/// independent of the pivot lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelSet {
    pub supports: Vec<f64>,
    pub resistances: Vec<f64>,
    pub dynamic_support: f64,
    pub dynamic_resistance: f64,
}

impl LevelSet {
    /// Highest recorded support.
    pub fn nearest_support(&self) -> Option<f64> {
        self.supports.last().copied()
    }

    /// Lowest recorded resistance.
    pub fn nearest_resistance(&self) -> Option<f64> {
        self.resistances.last().copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    None,
    Buy,
    Sell,
}

impl Decision {
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Decision::None)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Decision::None => "none",
            Decision::Buy => "buy",
            Decision::Sell => "sell",
        };
        f.write_str(s)
    }
}

/// Everything the arbiter and the risk filter look at for one cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signals {
    pub levels: LevelSet,
    pub trend: TrendSignal,
    pub pattern: Pattern,
    pub volume_confirmed: bool,
    pub current_price: f64,
}
