use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    // A check needed more history than the window holds.
    #[error("Insufficient data for {check}: need at least {required} candles, got {actual}")]
    InsufficientDataError {
        check: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Malformed candle at index {index}: {reason}")]
    MalformedCandleError { index: usize, reason: String },

    #[error("Market data error: {0}")]
    MarketDataError(String),

    #[error("Execution error: {0}")]
    ExecutionError(String),

    #[error("Internal processing error: {0}")]
    ProcessingError(String),

    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

impl EngineError {
    pub fn insufficient(check: &'static str, required: usize, actual: usize) -> Self {
        EngineError::InsufficientDataError { check, required, actual }
    }

    /// Failures scoped to one decision cycle: the session skips the cycle and
    /// keeps running instead of aborting.
    pub fn skips_cycle(&self) -> bool {
        matches!(
            self,
            EngineError::InsufficientDataError { .. }
                | EngineError::MalformedCandleError { .. }
                | EngineError::MarketDataError(_)
        )
    }
}
