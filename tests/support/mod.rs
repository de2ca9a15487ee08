#![allow(dead_code)]
pub mod fake_service;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

pub use fake_service::{DEFAULT_PRODUCT_COUNT, FakeOptions, FakeService};

/// Deterministic rng so a failing scenario can be replayed.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Route harness logs through the test writer; safe to call from every test.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Name of the check behind an assertion error.
pub fn assertion_check(err: &product_api_harness::HarnessError) -> &'static str {
    err.as_assertion().map(|failure| failure.check).unwrap_or("<not an assertion>")
}
