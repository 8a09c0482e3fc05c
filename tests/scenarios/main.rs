//! End-to-end scenarios over the public `weft` API
//!
//! Run with: cargo test --test scenarios
//! Set `RUST_LOG=weft=debug` to see the store's logs.

use std::sync::Once;

mod accounts;
mod custom_encoding;

static INIT_TRACING: Once = Once::new();

/// Install a test-writer subscriber once for the whole suite
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
