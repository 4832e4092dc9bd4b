//! Domain layer: payment requests, attempt bookkeeping, validation rules and
//! the ports the orchestrator drives.

pub mod outcome;
pub mod payment;
pub mod ports;
pub mod validation;
