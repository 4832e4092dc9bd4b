//! Outer surface: translates between JSON documents and the core types.

pub mod json;
