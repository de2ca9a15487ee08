//! Synthetic test data.
//!
//! - [`primitives`]: bounded random scalars (strings, numbers, picks, dates)
//! - [`tables`]: category codes, tag sets and phrase tables
//! - [`product`]: complete, internally consistent [`Product`](crate::model::Product)s
//! - [`payload`]: create / update / patch bodies, including invalid ones
//! - [`factory`]: `make` / `make_many` with override hooks

pub mod factory;
pub mod payload;
pub mod primitives;
pub mod product;
pub mod tables;

pub use factory::{Factory, ProductFactory, RegressionProducts, SmokeProducts};
pub use payload::{
    CreateOptions, InvalidPayload, InvalidVariant, PriceRange, Validity, generate_for_create,
    generate_invalid, generate_invalid_with, random_product_for_patch, random_product_for_post,
};
pub use primitives::{
    pick, random_date, random_date_between, random_decimal, random_float, random_int,
    random_string, round2,
};
pub use product::{generate_product, generate_product_in, generate_sku, generate_tags, is_valid_sku};
pub use tables::{ProductCategory, SERVICE_CATEGORIES};
