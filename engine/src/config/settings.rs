// Engine settings, loaded from a JSON file or the embedded defaults
use serde::Deserialize;
use std::path::Path;

use crate::data::market_data::timeframe_for;
use crate::error::EngineError;

const DEFAULT_CONFIG: &str = include_str!("../../config/default.json");

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    /// Instrument to trade; the first available one when unset.
    pub instrument: Option<String>,
    pub window: WindowSettings,
    pub fine_series: FineSeriesSettings,
    pub session: SessionSettings,
    /// CSV files loaded into the market data store at startup.
    pub data_files: Vec<DataFile>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowSettings {
    pub capacity: usize,
    pub granularity_seconds: u32,
    pub count: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FineSeriesSettings {
    pub granularity_seconds: u32,
    pub count: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SessionSettings {
    pub max_operations: u32,
    pub max_consecutive_losses: u32,
    pub cycle_pause_ms: u64,
    pub stake: f64,
    pub expiry_minutes: u32,
    pub min_stake: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DataFile {
    pub instrument: String,
    pub granularity_seconds: u32,
    pub path: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            instrument: None,
            window: WindowSettings::default(),
            fine_series: FineSeriesSettings::default(),
            session: SessionSettings::default(),
            data_files: Vec::new(),
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        WindowSettings {
            capacity: crate::models::DEFAULT_WINDOW_CAPACITY,
            granularity_seconds: 60,
            count: 15,
        }
    }
}

impl Default for FineSeriesSettings {
    fn default() -> Self {
        FineSeriesSettings { granularity_seconds: 1, count: 30 }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            max_operations: 25,
            max_consecutive_losses: 3,
            cycle_pause_ms: 1000,
            stake: 1.0,
            expiry_minutes: 1,
            min_stake: 1.0,
        }
    }
}

impl EngineSettings {
    /// Settings shipped with the engine (`config/default.json`).
    pub fn load_default() -> Result<Self, EngineError> {
        Self::from_json_str(DEFAULT_CONFIG)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let settings: EngineSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.window.capacity < 2 {
            return Err(EngineError::ConfigError(format!(
                "window.capacity must be at least 2, got {}",
                self.window.capacity
            )));
        }
        if self.window.count < 2 {
            return Err(EngineError::ConfigError(format!("window.count must be at least 2, got {}", self.window.count)));
        }
        timeframe_for(self.window.granularity_seconds)?;
        timeframe_for(self.fine_series.granularity_seconds)?;
        for file in &self.data_files {
            timeframe_for(file.granularity_seconds)?;
        }
        if !(self.session.stake.is_finite() && self.session.stake > 0.0) {
            return Err(EngineError::ConfigError(format!("session.stake must be positive, got {}", self.session.stake)));
        }
        if self.session.max_operations == 0 {
            return Err(EngineError::ConfigError("session.max_operations must be greater than 0".to_string()));
        }
        if self.session.max_consecutive_losses == 0 {
            return Err(EngineError::ConfigError("session.max_consecutive_losses must be greater than 0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_embedded_defaults_match_default_impl() {
        let loaded = EngineSettings::load_default().unwrap();
        assert_eq!(loaded, EngineSettings::default());
        assert_eq!(loaded.window.capacity, 80);
        assert_eq!(loaded.session.max_operations, 25);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = EngineSettings::from_json_str(r#"{"instrument": "EURUSD", "session": {"stake": 5.0}}"#).unwrap();
        assert_eq!(settings.instrument.as_deref(), Some("EURUSD"));
        assert_eq!(settings.session.stake, 5.0);
        assert_eq!(settings.session.max_consecutive_losses, 3);
        assert_eq!(settings.fine_series.count, 30);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"data_files": [{{"instrument": "EURUSD", "granularity_seconds": 60, "path": "eurusd_1m.csv"}}]}}"#
        )
        .unwrap();
        let settings = EngineSettings::load_from_file(file.path()).unwrap();
        assert_eq!(settings.data_files.len(), 1);
        assert_eq!(settings.data_files[0].path, "eurusd_1m.csv");
    }

    #[test]
    fn test_validation_errors() {
        let err = EngineSettings::from_json_str(r#"{"window": {"capacity": 1}}"#).unwrap_err();
        assert!(err.to_string().contains("window.capacity"));
        let err = EngineSettings::from_json_str(r#"{"fine_series": {"granularity_seconds": 7}}"#).unwrap_err();
        assert!(err.to_string().contains("Unsupported granularity"));
        let err = EngineSettings::from_json_str(r#"{"session": {"stake": 0.0}}"#).unwrap_err();
        assert!(err.to_string().contains("session.stake"));
        let err = EngineSettings::from_json_str(r#"{"session": {"max_operations": 0}}"#).unwrap_err();
        assert!(err.to_string().contains("session.max_operations"));
        let err = EngineSettings::from_json_str(r#"{"session": {"max_consecutive_losses": 0}}"#).unwrap_err();
        assert!(matches!(err, EngineError::ConfigError(ref msg) if msg.contains("session.max_consecutive_losses")));
        assert!(matches!(
            EngineSettings::from_json_str("{not json"),
            Err(EngineError::JsonError { .. })
        ));
        assert!(matches!(
            EngineSettings::load_from_file("missing_engine_config.json"),
            Err(EngineError::IoError { .. })
        ));
    }
}
