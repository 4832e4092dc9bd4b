use crate::domain::payment::{PaymentRequest, Transaction};
use crate::domain::ports::{GatewayError, GatewayFailure, PaymentGateway, Sleeper};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

/// What a [`ScriptedGateway`] does on a given call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedStep {
    Succeed,
    Fail(GatewayFailure),
    /// Break the gateway contract, e.g. a response that could not be classified.
    Violate(String),
}

/// A deterministic in-memory gateway that replays a fixed script.
///
/// Clones share the same script and call counter, so a test can keep a handle
/// after boxing one into the orchestrator.
#[derive(Clone)]
pub struct ScriptedGateway {
    steps: Arc<Mutex<VecDeque<ScriptedStep>>>,
    fallback: Option<ScriptedStep>,
    calls: Arc<AtomicU32>,
}

impl ScriptedGateway {
    /// Plays `steps` in order. Calls past the end break the gateway contract.
    pub fn sequence(steps: impl IntoIterator<Item = ScriptedStep>) -> Self {
        Self {
            steps: Arc::new(Mutex::new(steps.into_iter().collect())),
            fallback: None,
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Repeats `step` on every call.
    pub fn always(step: ScriptedStep) -> Self {
        Self {
            steps: Arc::new(Mutex::new(VecDeque::new())),
            fallback: Some(step),
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Number of calls received so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn attempt(&self, request: &PaymentRequest) -> Result<Transaction, GatewayError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let step = self.steps.lock().await.pop_front().or_else(|| self.fallback.clone());

        match step {
            Some(ScriptedStep::Succeed) => Ok(Transaction::for_request(
                request,
                format!("txn_scripted_{call}"),
                Utc::now(),
            )),
            Some(ScriptedStep::Fail(failure)) => Err(GatewayError::Failure(failure)),
            Some(ScriptedStep::Violate(reason)) => Err(GatewayError::Contract(reason)),
            None => Err(GatewayError::Contract(format!(
                "scripted gateway exhausted on call {call}"
            ))),
        }
    }
}

/// A sleeper that returns immediately and remembers every requested delay.
#[derive(Default, Clone)]
pub struct RecordingSleeper {
    delays: Arc<RwLock<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn delays(&self) -> Vec<Duration> {
        self.delays.read().await.clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.write().await.push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_scripted_gateway_plays_in_order() {
        let gateway = ScriptedGateway::sequence([
            ScriptedStep::Fail(GatewayFailure::terminal("Card declined", "CARD_DECLINED")),
            ScriptedStep::Succeed,
        ]);
        let request = PaymentRequest::new(dec!(12.5)).with_currency("EUR");

        let first = gateway.attempt(&request).await;
        assert!(matches!(first, Err(GatewayError::Failure(f)) if f.code.as_deref() == Some("CARD_DECLINED")));

        let tx = gateway.attempt(&request).await.unwrap();
        assert_eq!(tx.transaction_id, "txn_scripted_2");
        assert_eq!(tx.amount, dec!(12.5));
        assert_eq!(tx.currency, "EUR");

        assert!(matches!(
            gateway.attempt(&request).await,
            Err(GatewayError::Contract(_))
        ));
        assert_eq!(gateway.calls(), 3);
    }

    #[tokio::test]
    async fn test_scripted_gateway_always_repeats() {
        let gateway = ScriptedGateway::always(ScriptedStep::Succeed);
        let request = PaymentRequest::new(dec!(1));
        for _ in 0..5 {
            assert!(gateway.attempt(&request).await.is_ok());
        }
        assert_eq!(gateway.calls(), 5);
    }

    #[tokio::test]
    async fn test_recording_sleeper_shares_state_between_clones() {
        let sleeper = RecordingSleeper::new();
        let handle = sleeper.clone();

        sleeper.sleep(Duration::from_millis(5)).await;
        sleeper.sleep(Duration::from_millis(10)).await;

        assert_eq!(
            handle.delays().await,
            vec![Duration::from_millis(5), Duration::from_millis(10)]
        );
    }
}
