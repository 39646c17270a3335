use chrono::{DateTime, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use shared::models::Candle; // Using the Candle model from the shared crate
use std::fs::File;
use std::io::{BufReader, Read};

use crate::error::EngineError;

// Raw CSV row. Kept separate from `Candle` so each field can be reported by
// name when it fails to parse.
#[derive(Debug, Deserialize)]
struct CandleRecord {
    timestamp: String,
    open: String,
    high: String,
    low: String,
    close: String,
    volume: String,
}

pub struct CandleCsvLoader;

impl CandleCsvLoader {
    // CSV Header: timestamp,open,high,low,close,volume
    // Example Row: 2024-03-01T12:00:00Z,1.1012,1.1020,1.1008,1.1017,1532
    pub fn load_candles_from_csv(file_path: &str) -> Result<Vec<Candle>, EngineError> {
        let file = File::open(file_path)?;
        Self::load_candles_from_reader(BufReader::new(file))
    }

    /// Parses candles in file order. Rows are not re-sorted here; the market
    /// data store orders by timestamp on insert.
    pub fn load_candles_from_reader<R: Read>(reader: R) -> Result<Vec<Candle>, EngineError> {
        let mut rdr = ReaderBuilder::new().has_headers(true).trim(csv::Trim::All).from_reader(reader);

        let mut candles = Vec::new();
        for (idx, result) in rdr.deserialize::<CandleRecord>().enumerate() {
            let line = idx + 2;
            let record = result?;

            let timestamp = parse_timestamp(&record.timestamp).map_err(|e| field_error("timestamp", line, e))?;
            let open = parse_price(&record.open).map_err(|e| field_error("open", line, e))?;
            let high = parse_price(&record.high).map_err(|e| field_error("high", line, e))?;
            let low = parse_price(&record.low).map_err(|e| field_error("low", line, e))?;
            let close = parse_price(&record.close).map_err(|e| field_error("close", line, e))?;
            let volume = parse_price(&record.volume).map_err(|e| field_error("volume", line, e))?;

            candles.push(Candle { timestamp, open, high, low, close, volume });
        }
        Ok(candles)
    }
}

fn field_error(field: &str, line: usize, reason: String) -> EngineError {
    EngineError::CsvDataFormatError(format!("Error parsing '{}' at line {}: {}", field, line, reason))
}

fn parse_price(s: &str) -> Result<f64, String> {
    s.parse::<f64>().map_err(|e| format!("Failed to parse number '{}': {}", s, e))
}

// Accepts RFC 3339 or Unix seconds.
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let secs = s.parse::<i64>().map_err(|_| format!("Failed to parse timestamp '{}'", s))?;
    DateTime::from_timestamp(secs, 0).ok_or_else(|| format!("Timestamp '{}' out of range", s))
}
