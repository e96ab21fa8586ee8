//! HTTP middleware for request processing.
//!
//! Provides request tracing and CORS for the dashboard client.

pub mod cors;
pub mod tracing;
