#![allow(dead_code)]

use payretry::domain::ports::GatewayFailure;
use payretry::infrastructure::in_memory::{RecordingSleeper, ScriptedGateway, ScriptedStep};
use payretry::RetryOrchestrator;
use std::io::Write;
use tempfile::NamedTempFile;

pub fn timeout() -> ScriptedStep {
    ScriptedStep::Fail(GatewayFailure::retryable(
        "Payment gateway temporarily unavailable",
        "GATEWAY_TIMEOUT",
    ))
}

pub fn declined() -> ScriptedStep {
    ScriptedStep::Fail(GatewayFailure::terminal("Card declined", "CARD_DECLINED"))
}

/// Builds an orchestrator over `gateway`, returning handles to inspect it afterwards.
pub fn orchestrator(gateway: ScriptedGateway) -> (RetryOrchestrator, ScriptedGateway, RecordingSleeper) {
    let sleeper = RecordingSleeper::new();
    let orchestrator = RetryOrchestrator::new(Box::new(gateway.clone()), Box::new(sleeper.clone()));
    (orchestrator, gateway, sleeper)
}

pub fn request_file(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{body}").unwrap();
    file
}
