// Order execution collaborator and a simulated venue.
use async_trait::async_trait;
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::Decision;

#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub instrument: String,
    pub decision: Decision,
    pub stake: f64,
    pub expiry_minutes: u32,
}

/// What the venue reports back. A rejected order is a normal receipt, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderReceipt {
    pub accepted: bool,
    pub reference_id: String,
    pub message: String,
}

#[async_trait]
pub trait ExecutionVenue: Send + Sync {
    async fn place(&self, order: &OrderRequest) -> Result<OrderReceipt, EngineError>;
}

/// Fills every well-formed actionable order immediately.
pub struct SimulatedVenue {
    min_stake: f64,
}

impl SimulatedVenue {
    pub fn new(min_stake: f64) -> Self {
        SimulatedVenue { min_stake }
    }
}

#[async_trait]
impl ExecutionVenue for SimulatedVenue {
    async fn place(&self, order: &OrderRequest) -> Result<OrderReceipt, EngineError> {
        let reference_id = Uuid::new_v4().to_string();
        tracing::debug!(instrument = %order.instrument, decision = %order.decision, stake = order.stake, "Simulating order placement");

        let rejection = if !order.decision.is_actionable() {
            Some(format!("Nothing to execute for decision '{}'", order.decision))
        } else if order.instrument.trim().is_empty() {
            Some("Instrument is required".to_string())
        } else if order.stake.is_nan() || order.stake < self.min_stake {
            Some(format!("Stake {:.2} is below the minimum of {:.2}", order.stake, self.min_stake))
        } else {
            None
        };

        match rejection {
            Some(message) => {
                tracing::warn!(reference_id = %reference_id, instrument = %order.instrument, failure_reason = %message, "Simulated order rejected");
                Ok(OrderReceipt { accepted: false, reference_id, message })
            }
            None => {
                let message = format!(
                    "{} {} for {:.2} expiring in {} min simulated",
                    order.decision.to_string().to_uppercase(),
                    order.instrument,
                    order.stake,
                    order.expiry_minutes
                );
                tracing::info!(reference_id = %reference_id, message = %message, "Simulated order accepted");
                Ok(OrderReceipt { accepted: true, reference_id, message })
            }
        }
    }
}
