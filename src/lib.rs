//! Test-data generation and response validation for a product catalogue REST
//! API.
//!
//! The crate is layered leaf-first:
//!
//! - [`generators`]: random primitives, full synthetic products, request
//!   bodies (valid, invalid, edge-case) and factory bundles
//! - [`catalog`]: fixed and derived datasets shared by scenarios
//! - [`validation`]: structural and semantic checks on responses and on
//!   generated entities
//! - [`transport`] and [`api`]: request building over a pluggable transport,
//!   with raw and validated variants of every operation
//! - [`suite`]: a smoke run over the read endpoints
//!
//! Configuration and logging follow [`config`] and [`logging`].

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod generators;
pub mod logging;
pub mod model;
pub mod suite;
pub mod transport;
pub mod validation;

pub use api::{CreateScenario, ListQuery, ProductsApi};
pub use catalog::TestDataCatalog;
pub use config::{CliArgs, HarnessConfig};
pub use error::{AssertionFailure, ErrorKind, HarnessError, HarnessResult};
pub use logging::{LoggingConfig, init_logging};
pub use suite::{SuiteReport, run_smoke};
pub use transport::{ApiRequest, ApiResponse, HttpMethod, HttpTransport, Transport};

/// Client over HTTP built from a resolved configuration.
pub fn http_products_api(config: &HarnessConfig) -> HarnessResult<ProductsApi<HttpTransport>> {
    config.validate()?;
    let transport = HttpTransport::new(config)?;
    Ok(ProductsApi::new(
        transport,
        TestDataCatalog::new(config.max_known_id),
    ))
}
