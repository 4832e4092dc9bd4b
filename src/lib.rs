pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
pub mod telemetry;

pub use application::orchestrator::{
    DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS, RetryOptions, RetryOrchestrator,
};
pub use domain::validation::{ValidationResult, validate};
