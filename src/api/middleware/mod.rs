//! HTTP middleware for request processing.
//!
//! Provides request tracing and per-request audit records.

pub mod request_audit;
pub mod tracing;
