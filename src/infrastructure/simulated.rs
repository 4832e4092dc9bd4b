use crate::domain::payment::{PaymentRequest, Transaction};
use crate::domain::ports::{GatewayError, GatewayFailure, PaymentGateway};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;

pub const DEFAULT_FAILURE_RATE: f64 = 0.3;
pub const DEFAULT_LATENCY_MS: u64 = 100;

pub const GATEWAY_TIMEOUT_CODE: &str = "GATEWAY_TIMEOUT";
const GATEWAY_TIMEOUT_MESSAGE: &str = "Payment gateway temporarily unavailable";

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatorConfig {
    /// Fraction of calls, in `[0, 1]`, that fail with a retryable timeout.
    pub failure_rate: f64,
    /// Simulated network latency applied to every call.
    pub latency: Duration,
    /// Fixes the random sequence for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            failure_rate: DEFAULT_FAILURE_RATE,
            latency: Duration::from_millis(DEFAULT_LATENCY_MS),
            seed: None,
        }
    }
}

/// Stand-in for a real payment provider.
///
/// Models transient unavailability: after a fixed latency, a fixed fraction
/// of calls fail with a retryable `GATEWAY_TIMEOUT`, the rest succeed.
pub struct SimulatedGateway {
    failure_rate: f64,
    latency: Duration,
    rng: Mutex<StdRng>,
}

impl SimulatedGateway {
    pub fn new(config: SimulatorConfig) -> Result<Self> {
        if !(0.0..=1.0).contains(&config.failure_rate) {
            return Err(PaymentError::ConfigError(format!(
                "failure rate must be between 0 and 1, got {}",
                config.failure_rate
            )));
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            failure_rate: config.failure_rate,
            latency: config.latency,
            rng: Mutex::new(rng),
        })
    }

    /// Draws the pass/fail decision and, on success, the id suffix.
    fn roll(&self) -> Option<String> {
        // A poisoned lock only means another call panicked mid-draw; the rng is still usable.
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if rng.gen_bool(self.failure_rate) {
            return None;
        }
        let suffix = (0..ID_SUFFIX_LEN)
            .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect();
        Some(suffix)
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn attempt(&self, request: &PaymentRequest) -> std::result::Result<Transaction, GatewayError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let Some(suffix) = self.roll() else {
            return Err(GatewayError::Failure(GatewayFailure::retryable(
                GATEWAY_TIMEOUT_MESSAGE,
                GATEWAY_TIMEOUT_CODE,
            )));
        };

        let processed_at = Utc::now();
        let transaction_id = format!("txn_{}_{}", processed_at.timestamp_millis(), suffix);
        Ok(Transaction::for_request(request, transaction_id, processed_at))
    }
}
