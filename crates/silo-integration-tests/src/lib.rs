//! Integration test crate for the Silo workspace.
//!
//! This crate has no library code beyond a logging helper — it only
//! contains integration tests that exercise end-to-end yield flows across
//! multiple workspace crates.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p silo-integration-tests
//! ```

use std::sync::Once;

static INIT: Once = Once::new();

/// Install the log subscriber once per test process.
///
/// Honors `RUST_LOG`; output is captured per test.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
