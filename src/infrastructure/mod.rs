//! Adapters for the domain ports: the simulated gateway and tokio timer used
//! in production, and deterministic in-memory doubles for tests and demos.

pub mod in_memory;
pub mod simulated;
pub mod timer;
