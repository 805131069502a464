//! Shared helpers for integration tests.
//!
//! # Modules
//!
//! - `log_capture`: Captures tracing events emitted by the library
//! - `logger`: Structured per-test progress logging
//! - `server`: wiremock helpers mimicking the Wykop API

pub mod log_capture;
pub mod logger;
pub mod server;
