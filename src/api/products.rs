//! Product resource client.
//!
//! Each operation comes in two flavours: a raw call returning the
//! [`ApiResponse`] untouched, and a `*_with_validation` call that runs the
//! response through the validators and fails with
//! [`HarnessError::AssertionFailure`] on the first violated expectation.
//!
//! Update and patch validation take `expect_success`. With it set the strict
//! path applies (status 200, product shape, id unchanged, every sent field
//! echoed). Without it any of [`NEGATIVE_UPDATE_STATUSES`] is accepted, since
//! the remote mock does not reliably reject invalid input.

use super::endpoints::{
    ADD_PRODUCT, CATEGORIES, CATEGORY_LIST, ListQuery, PRODUCTS, SEARCH, category_path,
    product_path,
};
use crate::catalog::TestDataCatalog;
use crate::error::{AssertionFailure, HarnessError, HarnessResult};
use crate::generators::payload::{CreateOptions, generate_for_create, generate_invalid};
use crate::generators::primitives::pick;
use crate::model::{DeletedProduct, ProductPayload};
use crate::transport::{ApiRequest, ApiResponse, Transport};
use crate::validation::{
    validate_array_response, validate_category_entry, validate_category_slug,
    validate_delete_receipt, validate_fields_reflected, validate_not_found_body,
    validate_page_window, validate_pagination_structure, validate_product_structure,
    validate_search_hit, validate_selected_fields, validate_sorted_by, validate_status_code,
    validate_status_one_of,
};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

/// Statuses tolerated when an update or patch carries invalid data.
pub const NEGATIVE_UPDATE_STATUSES: &[u16] = &[200, 400, 422, 500];

/// Statuses tolerated when a create carries invalid data.
pub const NEGATIVE_CREATE_STATUSES: &[u16] = &[201, 400, 422, 500];

/// Fields a random valid patch draws from.
pub const PATCHABLE_FIELDS: &[&str] = &["title", "price", "description", "category", "stock"];

/// Shape of a create request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumString, EnumIter, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum CreateScenario {
    Valid,
    Invalid,
    EdgeCase,
}

/// Client for the `/products` resource over any [`Transport`].
#[derive(Debug, Clone)]
pub struct ProductsApi<T> {
    transport: T,
    catalog: TestDataCatalog,
}

impl<T: Transport> ProductsApi<T> {
    pub fn new(transport: T, catalog: TestDataCatalog) -> Self {
        Self { transport, catalog }
    }

    pub fn catalog(&self) -> &TestDataCatalog {
        &self.catalog
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn send(&self, request: ApiRequest) -> HarnessResult<ApiResponse> {
        self.transport.send(request).await
    }

    // =========================================================================
    // Raw operations
    // =========================================================================

    pub async fn get_all_products(&self, query: &ListQuery) -> HarnessResult<ApiResponse> {
        self.send(query.apply(ApiRequest::get(PRODUCTS))).await
    }

    /// Any id, including negative and zero ones, is sent as given.
    pub async fn get_product_by_id(&self, id: impl Display) -> HarnessResult<ApiResponse> {
        self.send(ApiRequest::get(product_path(id))).await
    }

    pub async fn search_products(&self, query: &str) -> HarnessResult<ApiResponse> {
        self.send(ApiRequest::get(SEARCH).query("q", query)).await
    }

    pub async fn get_products_by_category(&self, slug: &str) -> HarnessResult<ApiResponse> {
        self.send(ApiRequest::get(category_path(slug))).await
    }

    pub async fn get_category_list(&self) -> HarnessResult<ApiResponse> {
        self.send(ApiRequest::get(CATEGORY_LIST)).await
    }

    pub async fn get_categories(&self) -> HarnessResult<ApiResponse> {
        self.send(ApiRequest::get(CATEGORIES)).await
    }

    pub async fn create_product(&self, payload: &ProductPayload) -> HarnessResult<ApiResponse> {
        self.send(ApiRequest::post(ADD_PRODUCT).json(payload.to_value()))
            .await
    }

    pub async fn update_product(
        &self,
        id: impl Display,
        payload: &ProductPayload,
    ) -> HarnessResult<ApiResponse> {
        self.send(ApiRequest::put(product_path(id)).json(payload.to_value()))
            .await
    }

    pub async fn patch_product(
        &self,
        id: impl Display,
        payload: &ProductPayload,
    ) -> HarnessResult<ApiResponse> {
        self.send(ApiRequest::patch(product_path(id)).json(payload.to_value()))
            .await
    }

    pub async fn delete_product(&self, id: impl Display) -> HarnessResult<ApiResponse> {
        self.send(ApiRequest::delete(product_path(id))).await
    }

    // =========================================================================
    // Validated reads
    // =========================================================================

    /// List with envelope, window, field-selection and sort checks as the
    /// query calls for.
    pub async fn get_all_products_with_validation(
        &self,
        query: &ListQuery,
    ) -> HarnessResult<ApiResponse> {
        let response = self.get_all_products(query).await?;
        validate_status_code(response.status, 200)?;
        validate_pagination_structure(&response.body, false)?;

        match (&query.sort, query.pagination()) {
            (Some(sort), _) => validate_sorted_by(&response.body, sort.sort_by, sort.order)?,
            (None, Some(window)) => validate_page_window(&response.body, window)?,
            (None, None) => {}
        }

        if let Some(select) = &query.select {
            let fields: Vec<&str> = select.iter().map(String::as_str).collect();
            for product in products_of(&response.body) {
                validate_selected_fields(product, &fields)?;
            }
        } else {
            for product in products_of(&response.body) {
                validate_product_structure(product)?;
            }
        }

        tracing::debug!(
            total = response.body["total"].as_u64(),
            returned = products_of(&response.body).len(),
            limit = response.body["limit"].as_u64(),
            skip = response.body["skip"].as_u64(),
            "product page validated"
        );
        Ok(response)
    }

    pub async fn get_product_by_id_with_validation(&self, id: u64) -> HarnessResult<ApiResponse> {
        let response = self.get_product_by_id(id).await?;
        validate_status_code(response.status, 200)?;
        validate_product_structure(&response.body)?;
        expect_id(&response.body, id)?;
        Ok(response)
    }

    /// Every returned product belongs to `slug`.
    pub async fn get_products_by_category_with_validation(
        &self,
        slug: &str,
    ) -> HarnessResult<ApiResponse> {
        let response = self.get_products_by_category(slug).await?;
        validate_status_code(response.status, 200)?;
        validate_pagination_structure(&response.body, false)?;
        for (index, product) in products_of(&response.body).iter().enumerate() {
            let category = product.get("category").and_then(Value::as_str);
            if category != Some(slug) {
                return Err(AssertionFailure::new(
                    "category_membership",
                    format!("body.products[{index}].category"),
                    format!("'{slug}'"),
                    format!("{category:?}"),
                )
                .into());
            }
        }
        Ok(response)
    }

    pub async fn get_categories_with_validation(&self) -> HarnessResult<ApiResponse> {
        let response = self.get_categories().await?;
        validate_status_code(response.status, 200)?;
        validate_array_response(&response.body, 1)?;
        for entry in response.body.as_array().into_iter().flatten() {
            validate_category_entry(entry)?;
        }
        Ok(response)
    }

    pub async fn get_category_list_with_validation(&self) -> HarnessResult<ApiResponse> {
        let response = self.get_category_list().await?;
        validate_status_code(response.status, 200)?;
        validate_array_response(&response.body, 1)?;
        for (index, entry) in response.body.as_array().into_iter().flatten().enumerate() {
            let slug = entry.as_str().ok_or_else(|| {
                AssertionFailure::new(
                    "category_list",
                    format!("body[{index}]"),
                    "a string",
                    entry.to_string(),
                )
            })?;
            validate_category_slug(slug)?;
        }
        Ok(response)
    }

    /// Every hit mentions `term` in its title or description.
    pub async fn search_products_with_validation(&self, term: &str) -> HarnessResult<ApiResponse> {
        let response = self.search_products(term).await?;
        validate_status_code(response.status, 200)?;
        validate_pagination_structure(&response.body, false)?;
        for product in products_of(&response.body) {
            validate_search_hit(product, term)?;
        }
        Ok(response)
    }

    /// Documented contract for a query that matches nothing: status 200 and an
    /// empty result set with `total == 0`.
    pub async fn get_empty_search_results(&self, query: &str) -> HarnessResult<ApiResponse> {
        let request = ApiRequest::get(SEARCH).query("q", query).fail_on_status_code(false);
        let response = self.send(request).await?;
        validate_status_code(response.status, 200)?;
        validate_pagination_structure(&response.body, true)?;
        let total = response.body["total"].as_u64().unwrap_or_default();
        let returned = products_of(&response.body).len();
        if total != 0 || returned != 0 {
            return Err(AssertionFailure::new(
                "empty_search",
                format!("search q={query:?}"),
                "total 0 and no products",
                format!("total {total}, {returned} products"),
            )
            .into());
        }
        Ok(response)
    }

    /// Unknown categories answer 200 with an all-zero empty envelope.
    pub async fn get_nonexistent_category_with_validation(
        &self,
        slug: &str,
    ) -> HarnessResult<ApiResponse> {
        let request = ApiRequest::get(category_path(slug)).fail_on_status_code(false);
        let response = self.send(request).await?;
        validate_status_code(response.status, 200)?;
        validate_pagination_structure(&response.body, true)?;
        for field in ["total", "skip", "limit"] {
            let value = response.body[field].as_u64();
            if value != Some(0) {
                return Err(AssertionFailure::new(
                    "empty_category",
                    format!("body.{field}"),
                    "0",
                    format!("{value:?}"),
                )
                .into());
            }
        }
        if !products_of(&response.body).is_empty() {
            return Err(AssertionFailure::new(
                "empty_category",
                "body.products",
                "an empty array",
                format!("{} products", products_of(&response.body).len()),
            )
            .into());
        }
        Ok(response)
    }

    /// 404 with a "not found" message naming `id`.
    pub async fn get_product_by_invalid_id_with_validation(
        &self,
        id: i64,
    ) -> HarnessResult<ApiResponse> {
        let request = ApiRequest::get(product_path(id)).fail_on_status_code(false);
        let response = self.send(request).await?;
        validate_status_code(response.status, 404)?;
        validate_not_found_body(&response.body, "Product", id)?;
        Ok(response)
    }

    // =========================================================================
    // Validated writes
    // =========================================================================

    pub async fn create_product_with_validation(
        &self,
        payload: &ProductPayload,
    ) -> HarnessResult<ApiResponse> {
        let response = self.create_product(payload).await?;
        validate_status_code(response.status, 201)?;
        validate_product_structure(&response.body)?;
        Ok(response)
    }

    pub async fn update_product_with_validation(
        &self,
        id: u64,
        payload: &ProductPayload,
        expect_success: bool,
    ) -> HarnessResult<ApiResponse> {
        let response = self.update_product(id, payload).await?;
        self.check_write(&response, id, payload, expect_success, NEGATIVE_UPDATE_STATUSES)?;
        Ok(response)
    }

    pub async fn patch_product_with_validation(
        &self,
        id: u64,
        payload: &ProductPayload,
        expect_success: bool,
    ) -> HarnessResult<ApiResponse> {
        let response = self.patch_product(id, payload).await?;
        self.check_write(&response, id, payload, expect_success, NEGATIVE_UPDATE_STATUSES)?;
        Ok(response)
    }

    fn check_write(
        &self,
        response: &ApiResponse,
        id: u64,
        payload: &ProductPayload,
        expect_success: bool,
        tolerated: &[u16],
    ) -> HarnessResult<()> {
        if expect_success {
            validate_status_code(response.status, 200)?;
            validate_product_structure(&response.body)?;
            expect_id(&response.body, id)?;
            validate_fields_reflected(&payload.to_value(), &response.body)?;
        } else {
            validate_status_one_of(response.status, tolerated)?;
            note_accepted_invalid(response);
        }
        Ok(())
    }

    /// 200 with a receipt flagging `id` as deleted, decoded.
    pub async fn delete_product_with_validation(&self, id: u64) -> HarnessResult<DeletedProduct> {
        let response = self.delete_product(id).await?;
        validate_status_code(response.status, 200)?;
        validate_delete_receipt(&response.body, id)?;
        response.json()
    }

    // =========================================================================
    // Randomised scenarios
    // =========================================================================

    /// Build a body for `scenario` and POST it without judging the status.
    pub async fn create_with_scenario<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        scenario: CreateScenario,
    ) -> HarnessResult<(ProductPayload, ApiResponse)> {
        let payload = match scenario {
            CreateScenario::Valid => generate_for_create(rng, &CreateOptions::new())?,
            CreateScenario::Invalid => generate_invalid(rng).payload,
            CreateScenario::EdgeCase => {
                let datasets = self.catalog.post_datasets(rng)?;
                pick(rng, &datasets.edge_case)?.clone()
            }
        };
        let request = ApiRequest::post(ADD_PRODUCT)
            .json(payload.to_value())
            .fail_on_status_code(false);
        let response = self.send(request).await?;
        Ok((payload, response))
    }

    /// Valid bodies must be created (201 plus product shape); the others
    /// may land on any of [`NEGATIVE_CREATE_STATUSES`].
    pub async fn create_random_with_validation<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        scenario: CreateScenario,
    ) -> HarnessResult<(ProductPayload, ApiResponse)> {
        let (payload, response) = self.create_with_scenario(rng, scenario).await?;
        if scenario == CreateScenario::Valid {
            validate_status_code(response.status, 201)?;
            validate_product_structure(&response.body)?;
        } else {
            validate_status_one_of(response.status, NEGATIVE_CREATE_STATUSES)?;
            note_accepted_invalid(&response);
        }
        Ok((payload, response))
    }

    pub async fn update_with_random_valid_data<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        id: Option<u64>,
    ) -> HarnessResult<ApiResponse> {
        let id = id.unwrap_or_else(|| self.catalog.valid_product_id(rng));
        let datasets = self.catalog.post_datasets(rng)?;
        let payload = pick(rng, &datasets.valid)?.clone();
        self.update_product_with_validation(id, &payload, true).await
    }

    pub async fn update_with_random_edge_case_data<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        id: Option<u64>,
    ) -> HarnessResult<ApiResponse> {
        let id = id.unwrap_or_else(|| self.catalog.valid_product_id(rng));
        let datasets = self.catalog.post_datasets(rng)?;
        let payload = pick(rng, &datasets.edge_case)?.clone();
        self.update_product_with_validation(id, &payload, true).await
    }

    pub async fn update_with_random_invalid_data<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        id: Option<u64>,
    ) -> HarnessResult<ApiResponse> {
        let id = id.unwrap_or_else(|| self.catalog.valid_product_id(rng));
        let datasets = self.catalog.post_datasets(rng)?;
        let payload = pick(rng, &datasets.invalid)?.clone();
        self.update_product_with_validation(id, &payload, false).await
    }

    /// Patch one to three of [`PATCHABLE_FIELDS`] taken from a valid body.
    pub async fn patch_with_random_valid_data<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        id: Option<u64>,
    ) -> HarnessResult<ApiResponse> {
        let id = id.unwrap_or_else(|| self.catalog.valid_product_id(rng));
        let datasets = self.catalog.post_datasets(rng)?;
        let source = pick(rng, &datasets.valid)?;
        let count = rng.gen_range(1..=3);
        let fields: Vec<&str> = PATCHABLE_FIELDS.choose_multiple(rng, count).copied().collect();
        let payload = source.retain_fields(&fields);
        self.patch_product_with_validation(id, &payload, true).await
    }

    /// Patch only the field a random [`InvalidVariant`] corrupts; the empty
    /// payload variant sends `{}`.
    ///
    /// [`InvalidVariant`]: crate::generators::InvalidVariant
    pub async fn patch_with_random_invalid_data<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        id: Option<u64>,
    ) -> HarnessResult<ApiResponse> {
        let id = id.unwrap_or_else(|| self.catalog.valid_product_id(rng));
        let invalid = generate_invalid(rng);
        let payload = match invalid.variant.field() {
            Some(field) => invalid.payload.retain_fields(&[field]),
            None => invalid.payload,
        };
        self.patch_product_with_validation(id, &payload, false).await
    }

    /// DELETE the first id past the known dataset; expects 404 and a
    /// "not found" message.
    pub async fn delete_with_random_invalid_id(&self) -> HarnessResult<ApiResponse> {
        let id = self.catalog.first_missing_id();
        let response = self.delete_product(id).await?;
        validate_status_code(response.status, 404)?;
        validate_not_found_body(&response.body, "Product", id)?;
        Ok(response)
    }
}

fn products_of(body: &Value) -> &[Value] {
    body.get("products")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn expect_id(body: &Value, id: u64) -> Result<(), HarnessError> {
    let actual = body.get("id").and_then(Value::as_u64);
    if actual == Some(id) {
        Ok(())
    } else {
        Err(AssertionFailure::new(
            "product_id",
            "body.id",
            id.to_string(),
            format!("{actual:?}"),
        )
        .into())
    }
}

fn note_accepted_invalid(response: &ApiResponse) {
    if response.is_success() {
        tracing::info!(status = response.status, "service accepted invalid input");
    }
}
