//! Request builders for the product service.

pub mod endpoints;
pub mod products;

pub use endpoints::ListQuery;
pub use products::{
    CreateScenario, NEGATIVE_CREATE_STATUSES, NEGATIVE_UPDATE_STATUSES, PATCHABLE_FIELDS,
    ProductsApi,
};
