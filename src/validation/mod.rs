//! Response and entity validation.
//!
//! - [`response`] checks raw JSON bodies returned by the service: status codes,
//!   pagination envelopes, product and category shapes, "not found" messages,
//!   field selection and echo checks.
//! - [`entity`] checks typed values produced by the generators against the
//!   same contract plus their cross-field invariants.
//!
//! All checks return `Result<(), AssertionFailure>` so callers can either
//! propagate with `?` into a [`HarnessError`](crate::error::HarnessError) or
//! inspect the failure directly.
//!
//! # Usage
//!
//! ```
//! use product_api_harness::validation::{validate_product_structure, validate_status_code};
//! use serde_json::json;
//!
//! let body = json!({
//!     "id": 1, "title": "Lamp", "description": "", "price": 12.5,
//!     "stock": 3, "category": "home-decoration"
//! });
//! validate_status_code(200, 200).unwrap();
//! validate_product_structure(&body).unwrap();
//! ```

pub mod entity;
pub mod response;

pub use entity::{validate_create_payload, validate_generated_product};
pub use response::{
    CheckResult, compare_sort_keys, not_found_phrasings, validate_array_response, validate_category_entry,
    validate_category_slug, validate_date_format, validate_delete_receipt,
    validate_error_response, validate_fields_reflected, validate_not_found_body,
    validate_not_found_message, validate_numeric_range, validate_page_window,
    validate_pagination_structure, validate_product_structure, validate_response_structure,
    validate_search_hit, validate_selected_fields, validate_sorted_by, validate_status_code, validate_status_one_of,
};
