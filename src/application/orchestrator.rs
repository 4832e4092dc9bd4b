use crate::domain::outcome::{AttemptError, AttemptRecord, PaymentOutcome};
use crate::domain::payment::PaymentRequest;
use crate::domain::ports::{GatewayError, PaymentGatewayBox, SleeperBox};
use crate::error::{PaymentError, Result};
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Retry budget for a single orchestration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryOptions {
    /// Retries after the first attempt, so a run makes at most `max_retries + 1` calls.
    pub max_retries: u32,
    /// Base delay, doubled after every failed attempt.
    pub retry_delay_ms: u64,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

impl RetryOptions {
    pub fn new(max_retries: u32, retry_delay_ms: u64) -> Self {
        Self {
            max_retries,
            retry_delay_ms,
        }
    }

    /// Wait applied after the 0-indexed `attempt` fails: `retry_delay_ms * 2^attempt`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        Duration::from_millis(self.retry_delay_ms.saturating_mul(factor))
    }
}

/// Submits payments to a gateway, retrying transient failures.
///
/// Each call to [`RetryOrchestrator::process_with_retry`] is an independent
/// run. Attempts within a run are strictly sequential: the next attempt only
/// starts once the previous result is known and its backoff has elapsed.
pub struct RetryOrchestrator {
    gateway: PaymentGatewayBox,
    sleeper: SleeperBox,
}

impl RetryOrchestrator {
    /// Creates a new `RetryOrchestrator`.
    ///
    /// # Arguments
    ///
    /// * `gateway` - The payment gateway every attempt is sent to.
    /// * `sleeper` - Performs the backoff waits between attempts.
    pub fn new(gateway: PaymentGatewayBox, sleeper: SleeperBox) -> Self {
        Self { gateway, sleeper }
    }

    /// Processes an already validated payment, retrying retryable failures.
    ///
    /// Success and payment failure are both returned as `Ok` with the outcome's
    /// `final_status` set accordingly. `Err` is reserved for a gateway that
    /// breaks its contract.
    pub async fn process_with_retry(
        &self,
        request: PaymentRequest,
        options: RetryOptions,
    ) -> Result<PaymentOutcome> {
        let mut outcome = PaymentOutcome::new(request, Utc::now());
        let mut attempt: u32 = 0;

        loop {
            let record = AttemptRecord::started(attempt + 1, Utc::now());
            debug!(attempt = attempt + 1, "Submitting payment attempt");

            let result = self.gateway.attempt(outcome.payment_details()).await;
            let failure = match result {
                Ok(transaction) => {
                    outcome.push_attempt(record.succeeded(transaction.transaction_id.clone()));
                    info!(
                        attempts = outcome.total_attempts(),
                        transaction_id = %transaction.transaction_id,
                        "Payment succeeded"
                    );
                    outcome.succeed(transaction, Utc::now());
                    return Ok(outcome);
                }
                Err(GatewayError::Failure(failure)) => failure,
                Err(GatewayError::Contract(reason)) => {
                    return Err(PaymentError::GatewayContract(reason));
                }
            };

            let error = AttemptError::from(failure);
            warn!(
                attempt = attempt + 1,
                code = error.code.as_deref().unwrap_or("UNKNOWN"),
                retryable = error.retryable,
                "Payment attempt failed: {}",
                error.message
            );
            outcome.push_attempt(record.failed(error.clone()));

            if !error.retryable || attempt >= options.max_retries {
                info!(attempts = outcome.total_attempts(), "Payment failed");
                outcome.fail(error, Utc::now());
                return Ok(outcome);
            }

            outcome.mark_retrying();
            let delay = options.backoff_delay(attempt);
            info!(
                next_attempt = attempt + 2,
                delay_ms = delay.as_millis() as u64,
                "Retrying payment after backoff"
            );
            self.sleeper.sleep(delay).await;
            attempt += 1;
        }
    }
}
