//! Reconciliation use case: request in, response out

use std::sync::Arc;
use tracing::{debug, instrument};

use crate::config::ReconciliationConfig;
use crate::mapping::{ReconciliationRequest, ReconciliationResponse};
use crate::reconciliation::ReconciliationEngine;
use crate::traits::*;
use crate::types::*;

/// Main entry point that validates a request and reconciles it
pub struct ReconciliationService {
    config: ReconciliationConfig,
    clock: Arc<dyn Clock>,
    engine: ReconciliationEngine,
}

impl ReconciliationService {
    /// Create a service on the system clock
    pub fn new(config: ReconciliationConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a service whose date checks and verdicts use the given clock
    pub fn with_clock(config: ReconciliationConfig, clock: Arc<dyn Clock>) -> Self {
        let engine = ReconciliationEngine::with_clock(Arc::clone(&clock));
        Self {
            config,
            clock,
            engine,
        }
    }

    /// Create a service around a custom engine
    pub fn with_engine(
        config: ReconciliationConfig,
        clock: Arc<dyn Clock>,
        engine: ReconciliationEngine,
    ) -> Self {
        Self {
            config,
            clock,
            engine,
        }
    }

    pub fn config(&self) -> &ReconciliationConfig {
        &self.config
    }

    pub fn engine(&self) -> &ReconciliationEngine {
        &self.engine
    }

    /// Validate a request against its certified balances
    #[instrument(
        skip_all,
        fields(movements = request.movements.len(), balances = request.balances.len())
    )]
    pub fn validate(&self, request: &ReconciliationRequest) -> DomainResult<ReconciliationResponse> {
        let command = request.to_command(&self.config, self.clock.as_ref())?;
        let verdicts = self.engine.sync(&command);
        let response = ReconciliationResponse::from_verdicts(&verdicts);

        debug!(is_valid = response.is_valid, "request validated");
        Ok(response)
    }

    /// JSON in, JSON out
    pub fn validate_json(&self, payload: &str) -> DomainResult<String> {
        let request = ReconciliationRequest::from_json(payload)?;
        self.validate(&request)?.to_json()
    }
}
