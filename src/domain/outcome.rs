use super::payment::{PaymentRequest, PaymentStatus, Transaction};
use super::ports::GatewayFailure;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Failure details captured for a single attempt.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct AttemptError {
    pub message: String,
    pub code: Option<String>,
    pub retryable: bool,
}

impl From<GatewayFailure> for AttemptError {
    fn from(failure: GatewayFailure) -> Self {
        Self {
            message: failure.message,
            code: failure.code,
            retryable: failure.retryable.unwrap_or(false),
        }
    }
}

/// One gateway call within an orchestration run.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    /// 1-indexed position of the attempt in its run.
    pub attempt_number: u32,
    pub timestamp: DateTime<Utc>,
    pub status: PaymentStatus,
    pub error: Option<AttemptError>,
    pub transaction_id: Option<String>,
}

impl AttemptRecord {
    pub fn started(attempt_number: u32, timestamp: DateTime<Utc>) -> Self {
        Self {
            attempt_number,
            timestamp,
            status: PaymentStatus::Pending,
            error: None,
            transaction_id: None,
        }
    }

    pub fn succeeded(self, transaction_id: impl Into<String>) -> Self {
        Self {
            status: PaymentStatus::Success,
            transaction_id: Some(transaction_id.into()),
            ..self
        }
    }

    pub fn failed(self, error: AttemptError) -> Self {
        Self {
            status: PaymentStatus::Failed,
            error: Some(error),
            ..self
        }
    }
}

/// Summary of one orchestration run.
///
/// Built incrementally by the orchestrator and handed back once the run is
/// terminal. Attempts can only be appended, and `completed_at` is set in the
/// same step that moves `final_status` to `Success` or `Failed`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOutcome {
    payment_details: PaymentRequest,
    attempts: Vec<AttemptRecord>,
    total_attempts: u32,
    final_status: PaymentStatus,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transaction: Option<Transaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<AttemptError>,
}

impl PaymentOutcome {
    pub fn new(payment_details: PaymentRequest, started_at: DateTime<Utc>) -> Self {
        Self {
            payment_details,
            attempts: Vec::new(),
            total_attempts: 0,
            final_status: PaymentStatus::Pending,
            started_at,
            completed_at: None,
            transaction: None,
            error: None,
        }
    }

    pub fn payment_details(&self) -> &PaymentRequest {
        &self.payment_details
    }

    pub fn attempts(&self) -> &[AttemptRecord] {
        &self.attempts
    }

    pub fn total_attempts(&self) -> u32 {
        self.total_attempts
    }

    pub fn final_status(&self) -> PaymentStatus {
        self.final_status
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn transaction(&self) -> Option<&Transaction> {
        self.transaction.as_ref()
    }

    pub fn error(&self) -> Option<&AttemptError> {
        self.error.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.final_status == PaymentStatus::Success
    }

    pub(crate) fn push_attempt(&mut self, record: AttemptRecord) {
        // Counted on append rather than before the gateway call, so it always equals `attempts.len()`.
        self.attempts.push(record);
        self.total_attempts = self.attempts.len() as u32;
    }

    pub(crate) fn mark_retrying(&mut self) {
        self.final_status = PaymentStatus::Retrying;
    }

    pub(crate) fn succeed(&mut self, transaction: Transaction, completed_at: DateTime<Utc>) {
        self.final_status = PaymentStatus::Success;
        self.completed_at = Some(completed_at);
        self.transaction = Some(transaction);
    }

    pub(crate) fn fail(&mut self, error: AttemptError, completed_at: DateTime<Utc>) {
        self.final_status = PaymentStatus::Failed;
        self.completed_at = Some(completed_at);
        self.error = Some(error);
    }
}
