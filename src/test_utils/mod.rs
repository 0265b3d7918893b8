//! Test utilities for noticegen
//!
//! This module provides helpers shared by unit and integration tests:
//! - [`MockHttpClient`], an in-memory [`crate::http::HttpClient`] that serves
//!   canned responses and records every request
//! - [`fixtures`], sample manifests, configuration files and discovery pages
//! - [`init_test_logging`], one-time tracing setup for tests
//!
//! # Example
//!
//! ```rust,ignore
//! use noticegen::test_utils::MockHttpClient;
//!
//! let http = MockHttpClient::new()
//!     .with_body("https://registry.npmjs.org/left-pad", r#"{"name":"left-pad"}"#);
//! assert!(http.requests().is_empty());
//! ```

pub mod fixtures;
pub mod http;

pub use fixtures::{ConfigFixture, ManifestFixture, go_import_page};
pub use http::MockHttpClient;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise
/// `RUST_LOG`; with neither, logging stays disabled.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
