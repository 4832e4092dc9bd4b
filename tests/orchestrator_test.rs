use payretry::domain::payment::{PaymentRequest, PaymentStatus};
use payretry::domain::ports::GatewayFailure;
use payretry::infrastructure::in_memory::{ScriptedGateway, ScriptedStep};
use payretry::RetryOptions;
use rust_decimal_macros::dec;
use std::time::Duration;

mod common;

fn request() -> PaymentRequest {
    PaymentRequest::new(dec!(100)).with_currency("USD")
}

#[tokio::test]
async fn test_exhausts_retry_budget() {
    for max_retries in 0..=5 {
        let (orchestrator, gateway, sleeper) =
            common::orchestrator(ScriptedGateway::always(common::timeout()));

        let outcome = orchestrator
            .process_with_retry(request(), RetryOptions::new(max_retries, 100))
            .await
            .unwrap();

        assert_eq!(outcome.final_status(), PaymentStatus::Failed);
        assert_eq!(outcome.total_attempts(), max_retries + 1);
        assert_eq!(outcome.attempts().len() as u32, outcome.total_attempts());
        assert_eq!(gateway.calls(), max_retries + 1);
        assert!(outcome.attempts().iter().all(|a| a.status == PaymentStatus::Failed));

        // One wait between each pair of attempts, none after the last.
        let expected: Vec<_> = (0..max_retries)
            .map(|i| Duration::from_millis(100 * 2u64.pow(i)))
            .collect();
        assert_eq!(sleeper.delays().await, expected);

        let error = outcome.error().unwrap();
        assert_eq!(error.code.as_deref(), Some("GATEWAY_TIMEOUT"));
        assert!(error.retryable);
    }
}

#[tokio::test]
async fn test_recovers_after_one_transient_failure() {
    let (orchestrator, _, sleeper) = common::orchestrator(ScriptedGateway::sequence([
        common::timeout(),
        ScriptedStep::Succeed,
    ]));

    let outcome = orchestrator
        .process_with_retry(request(), RetryOptions::new(1, 1000))
        .await
        .unwrap();

    assert_eq!(outcome.final_status(), PaymentStatus::Success);
    assert_eq!(outcome.total_attempts(), 2);

    let attempts = outcome.attempts();
    assert_eq!(attempts[0].attempt_number, 1);
    assert_eq!(attempts[0].status, PaymentStatus::Failed);
    assert!(attempts[0].transaction_id.is_none());
    assert_eq!(attempts[1].attempt_number, 2);
    assert_eq!(attempts[1].status, PaymentStatus::Success);
    assert!(attempts[1].error.is_none());

    let transaction = outcome.transaction().unwrap();
    assert_eq!(transaction.amount, dec!(100));
    assert_eq!(transaction.currency, "USD");
    assert!(outcome.error().is_none());
    assert_eq!(sleeper.delays().await, vec![Duration::from_millis(1000)]);
}

#[tokio::test]
async fn test_non_retryable_failure_stops_immediately() {
    let (orchestrator, gateway, sleeper) =
        common::orchestrator(ScriptedGateway::sequence([common::declined(), ScriptedStep::Succeed]));

    let outcome = orchestrator
        .process_with_retry(request(), RetryOptions::new(10, 50))
        .await
        .unwrap();

    assert_eq!(outcome.final_status(), PaymentStatus::Failed);
    assert_eq!(outcome.total_attempts(), 1);
    assert_eq!(gateway.calls(), 1);
    assert!(sleeper.delays().await.is_empty());
    assert_eq!(outcome.error().unwrap().code.as_deref(), Some("CARD_DECLINED"));
}

#[tokio::test]
async fn test_unclassified_failure_is_not_retried() {
    let unclassified = ScriptedStep::Fail(GatewayFailure {
        message: "Unexpected response".to_string(),
        code: None,
        retryable: None,
    });
    let (orchestrator, gateway, _) = common::orchestrator(ScriptedGateway::always(unclassified));

    let outcome = orchestrator
        .process_with_retry(request(), RetryOptions::default())
        .await
        .unwrap();

    assert_eq!(gateway.calls(), 1);
    let error = outcome.error().unwrap();
    assert!(!error.retryable);
    assert!(error.code.is_none());
}

#[tokio::test]
async fn test_non_retryable_after_transient_failures() {
    let (orchestrator, _, sleeper) = common::orchestrator(ScriptedGateway::sequence([
        common::timeout(),
        common::timeout(),
        common::declined(),
    ]));

    let outcome = orchestrator
        .process_with_retry(request(), RetryOptions::new(5, 10))
        .await
        .unwrap();

    assert_eq!(outcome.total_attempts(), 3);
    assert_eq!(outcome.error().unwrap().code.as_deref(), Some("CARD_DECLINED"));
    assert_eq!(sleeper.delays().await.len(), 2);
}

#[tokio::test]
async fn test_completion_is_stamped_with_terminal_status() {
    for script in [
        ScriptedGateway::always(ScriptedStep::Succeed),
        ScriptedGateway::always(common::timeout()),
        ScriptedGateway::always(common::declined()),
    ] {
        let (orchestrator, _, _) = common::orchestrator(script);
        let outcome = orchestrator
            .process_with_retry(request(), RetryOptions::new(2, 1))
            .await
            .unwrap();

        assert!(outcome.final_status().is_terminal());
        let completed_at = outcome.completed_at().unwrap();
        assert!(completed_at >= outcome.started_at());
        for pair in outcome.attempts().windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }
}

#[tokio::test]
async fn test_outcome_echoes_payment_details() {
    let request = PaymentRequest::new(dec!(25)).with_customer("cust_7");
    let (orchestrator, _, _) = common::orchestrator(ScriptedGateway::always(ScriptedStep::Succeed));

    let outcome = orchestrator
        .process_with_retry(request.clone(), RetryOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome.payment_details(), &request);
    assert_eq!(outcome.transaction().unwrap().currency, "USD");
}
