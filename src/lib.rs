//! wykop - Wykop v3 API client
//!
//! An async client for the Wykop REST API (microblog entries, comments,
//! votes, tags and media uploads) plus a small CLI on top of it.
//!
//! ```rust,ignore
//! use wykop::api::{EntriesQuery, WykopApi};
//! use wykop::core::{ConnectorConfig, Credentials};
//!
//! let credentials = Credentials::from_parts(Some(key), Some(secret), None)?;
//! let api = WykopApi::connect(ConnectorConfig::default(), credentials).await?;
//! let entries = api.get_entries(&EntriesQuery::default()).await?;
//! ```

// Note: deny (not forbid) to allow #[allow(unsafe_code)] in test helpers for env var manipulation
#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod cli;
pub mod core;
pub mod error;
pub mod storage;
pub mod util;

/// Test utilities module - included in test builds or when test-utils feature is enabled.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use api::WykopApi;
pub use error::{ExitCode, Result, WykopError};

// Re-export test utilities for external test crates
#[cfg(any(test, feature = "test-utils"))]
pub use test_utils::*;
