use super::payment::{PaymentRequest, Transaction};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// A payment failure as classified by the gateway.
///
/// `retryable` is optional because a gateway may not classify a failure; the
/// orchestrator treats an unclassified failure as terminal.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct GatewayFailure {
    pub message: String,
    pub code: Option<String>,
    pub retryable: Option<bool>,
}

impl GatewayFailure {
    pub fn retryable(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(code.into()),
            retryable: Some(true),
        }
    }

    pub fn terminal(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(code.into()),
            retryable: Some(false),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum GatewayError {
    /// The payment was not processed. Recorded as a failed attempt.
    #[error("{}", .0.message)]
    Failure(GatewayFailure),
    /// The gateway misbehaved outside its contract. Never retried.
    #[error("{0}")]
    Contract(String),
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn attempt(&self, request: &PaymentRequest) -> Result<Transaction, GatewayError>;
}

/// Waits between attempts. Swapped for a non-blocking recorder in tests.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
pub type SleeperBox = Box<dyn Sleeper>;
