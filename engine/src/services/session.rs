// Bounded decision session: fetch, evaluate, execute, pause, repeat.
use serde::Serialize;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::config::settings::EngineSettings;
use crate::data::market_data::MarketDataProvider;
use crate::error::EngineError;
use crate::models::{CandleWindow, Decision, FineSeries};
use crate::services::execution::{ExecutionVenue, OrderRequest};
use crate::strategy::{self, CycleReport};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSummary {
    pub instrument: String,
    pub cycles: u32,
    pub skipped_cycles: u32,
    pub orders_accepted: u32,
    pub orders_rejected: u32,
    pub consecutive_losses: u32,
}

pub struct Session<P, V> {
    provider: P,
    venue: V,
    settings: EngineSettings,
}

impl<P: MarketDataProvider, V: ExecutionVenue> Session<P, V> {
    pub fn new(provider: P, venue: V, settings: EngineSettings) -> Self {
        Session { provider, venue, settings }
    }

    /// The configured instrument, or the first one the provider offers.
    pub async fn select_instrument(&self) -> Result<String, EngineError> {
        if let Some(instrument) = &self.settings.instrument {
            return Ok(instrument.clone());
        }
        let instruments = self.provider.available_instruments().await?;
        info!(available = ?instruments, "Available instruments");
        instruments
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::MarketDataError("No instruments available".to_string()))
    }

    /// Fetches fresh data and evaluates one decision cycle. Nothing is executed.
    pub async fn run_cycle(&self, instrument: &str) -> Result<CycleReport, EngineError> {
        let window_settings = &self.settings.window;
        let candles = self
            .provider
            .fetch_window(instrument, window_settings.granularity_seconds, window_settings.count)
            .await?;
        let window = CandleWindow::from_newest_first(candles, window_settings.capacity)?;
        let fine_series = FineSeries::from_oldest_first(self.provider.fetch_fine_series(instrument).await?)?;
        strategy::evaluate(&window, &fine_series)
    }

    /// Runs cycles until the operation limit is reached or `shutdown` flips to
    /// true. A stop request is only honoured between cycles.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<SessionSummary, EngineError> {
        let instrument = self.select_instrument().await?;
        let limits = &self.settings.session;
        let pause = Duration::from_millis(limits.cycle_pause_ms);
        info!(instrument = %instrument, max_operations = limits.max_operations, "Session started");

        let mut summary = SessionSummary { instrument: instrument.clone(), ..Default::default() };
        // The venue reports acceptance only, never a trade outcome, so nothing
        // increments `consecutive_losses` and the loss limit never trips.
        while summary.cycles < limits.max_operations && summary.consecutive_losses < limits.max_consecutive_losses {
            if *shutdown.borrow() {
                info!(instrument = %instrument, "Session stopped by shutdown request");
                break;
            }
            summary.cycles += 1;

            match self.run_cycle(&instrument).await {
                Ok(report) => {
                    log_report(&instrument, &report);
                    if report.decision.is_actionable() {
                        self.execute(&instrument, report.decision, &mut summary).await;
                    }
                }
                Err(e) if e.skips_cycle() => {
                    summary.skipped_cycles += 1;
                    warn!(instrument = %instrument, cycle = summary.cycles, error = %e, "Cycle skipped");
                }
                Err(e) => {
                    error!(instrument = %instrument, cycle = summary.cycles, error = %e, "Session aborted");
                    return Err(e);
                }
            }

            if summary.cycles < limits.max_operations && !pause.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(pause) => {}
                    changed = shutdown.changed() => {
                        // Sender gone: nobody can stop us any more, keep pacing.
                        if changed.is_err() {
                            tokio::time::sleep(pause).await;
                        }
                    }
                }
            }
        }

        info!(
            instrument = %summary.instrument,
            cycles = summary.cycles,
            skipped = summary.skipped_cycles,
            accepted = summary.orders_accepted,
            rejected = summary.orders_rejected,
            consecutive_losses = summary.consecutive_losses,
            "Session finished"
        );
        Ok(summary)
    }

    async fn execute(&self, instrument: &str, decision: Decision, summary: &mut SessionSummary) {
        let order = OrderRequest {
            instrument: instrument.to_string(),
            decision,
            stake: self.settings.session.stake,
            expiry_minutes: self.settings.session.expiry_minutes,
        };
        match self.venue.place(&order).await {
            Ok(receipt) if receipt.accepted => {
                summary.orders_accepted += 1;
                info!(instrument = %instrument, decision = %decision, stake = order.stake, reference_id = %receipt.reference_id, "Order executed");
            }
            Ok(receipt) => {
                summary.orders_rejected += 1;
                error!(instrument = %instrument, decision = %decision, reference_id = %receipt.reference_id, reason = %receipt.message, "Order execution failed");
            }
            Err(e) => {
                summary.orders_rejected += 1;
                error!(instrument = %instrument, decision = %decision, error = %e, "Order execution failed");
            }
        }
    }
}

fn log_report(instrument: &str, report: &CycleReport) {
    let signals = &report.signals;
    info!(
        instrument = %instrument,
        pattern = %signals.pattern,
        supports = ?signals.levels.supports,
        resistances = ?signals.levels.resistances,
        dynamic_support = signals.levels.dynamic_support,
        dynamic_resistance = signals.levels.dynamic_resistance,
        volume_confirmed = signals.volume_confirmed,
        short_trend = %signals.trend.short_trend,
        overall_trend = %signals.trend.overall_trend,
        wave_pattern = %signals.trend.wave_pattern,
        current_price = signals.current_price,
        tentative = %report.tentative,
        decision = %report.decision,
        "Cycle evaluated"
    );
    if let Some(reason) = report.veto {
        warn!(instrument = %instrument, tentative = %report.tentative, veto = %reason, "Trade avoided");
    } else if report.decision.is_actionable() {
        info!(instrument = %instrument, decision = %report.decision, "Operation scheduled for the next candle");
    }
}
