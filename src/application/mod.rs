//! Application layer containing the retry orchestration.
//!
//! `RetryOrchestrator` is the entry point for submitting a validated payment.
//! It owns its gateway and sleeper ports and keeps no state between runs, so
//! concurrent requests can each drive their own orchestration on separate
//! `tokio` tasks.

pub mod orchestrator;
