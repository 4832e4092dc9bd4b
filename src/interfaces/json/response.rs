use chrono::{DateTime, Utc};
use serde::Serialize;

/// Body emitted when a request is rejected before processing.
#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
pub struct Rejection {
    pub status: &'static str,
    pub errors: Vec<String>,
}

impl Rejection {
    pub fn new(errors: Vec<String>) -> Self {
        Self {
            status: "error",
            errors,
        }
    }
}

/// Basic process information.
#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

impl ServiceInfo {
    pub fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            status: "ok",
            timestamp: Utc::now(),
        }
    }
}

/// Liveness document.
#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
pub struct Health {
    pub status: &'static str,
}

impl Health {
    pub fn healthy() -> Self {
        Self { status: "healthy" }
    }
}

/// Answer to a transaction lookup.
///
/// Transactions are not persisted, so the lookup echoes the id and reports
/// its status as unknown.
#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLookup {
    pub transaction_id: String,
    pub status: &'static str,
}

impl TransactionLookup {
    pub fn new(transaction_id: impl Into<String>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            status: "unknown",
        }
    }
}
