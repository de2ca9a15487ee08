//! In-process stand-in for the product service.
//!
//! Serves a deterministic catalogue over the same routes and response shapes
//! as the public mock, including its quirks: unknown categories answer 200
//! with an all-zero envelope, an empty search term returns everything, and
//! writes are echoed without being persisted.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use product_api_harness::generators::product::generate_product_in;
use product_api_harness::generators::tables::{ProductCategory, SERVICE_CATEGORIES};
use product_api_harness::model::ProductPayload;
use product_api_harness::validation::{compare_sort_keys, validate_create_payload};
use product_api_harness::{HarnessConfig, HttpTransport, ProductsApi, http_products_api};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Three products per service category.
pub const DEFAULT_PRODUCT_COUNT: u64 = 72;
const DEFAULT_LIMIT: usize = 30;
const CATALOGUE_SEED: u64 = 0x5EED;

#[derive(Debug, Clone, Copy)]
pub struct FakeOptions {
    pub product_count: u64,
    /// Answer create/update bodies that break the business rules with 400.
    pub reject_invalid: bool,
    /// Answer an empty `q` with the whole catalogue, as the public mock does.
    pub empty_search_returns_all: bool,
}

impl Default for FakeOptions {
    fn default() -> Self {
        Self {
            product_count: DEFAULT_PRODUCT_COUNT,
            reject_invalid: false,
            empty_search_returns_all: true,
        }
    }
}

struct FakeState {
    base_url: String,
    products: Vec<Value>,
    options: FakeOptions,
}

pub struct FakeService {
    base_url: String,
    options: FakeOptions,
    handle: JoinHandle<()>,
}

impl FakeService {
    pub async fn start() -> Self {
        Self::start_with(FakeOptions::default()).await
    }

    pub async fn start_with(options: FakeOptions) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake service");
        let addr = listener.local_addr().expect("fake service address");
        let base_url = format!("http://{addr}");

        let state = Arc::new(FakeState {
            base_url: base_url.clone(),
            products: seed_products(options.product_count),
            options,
        });
        let app = router(state);
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url,
            options,
            handle,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn product_count(&self) -> u64 {
        self.options.product_count
    }

    pub fn config(&self) -> HarnessConfig {
        HarnessConfig::for_base_url(self.base_url.clone()).with_max_known_id(self.product_count())
    }

    pub fn api(&self) -> ProductsApi<HttpTransport> {
        http_products_api(&self.config()).expect("client for fake service")
    }
}

impl Drop for FakeService {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn router(state: Arc<FakeState>) -> Router {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/search", get(search_products))
        .route("/products/categories", get(categories))
        .route("/products/category-list", get(category_list))
        .route("/products/category/", get(empty_category))
        .route("/products/category/{slug}", get(products_in_category))
        .route("/products/add", post(add_product))
        .route(
            "/products/{id}",
            get(get_product)
                .put(update_product)
                .patch(update_product)
                .delete(delete_product),
        )
        .with_state(state)
}

/// Ids are dense from 1; categories cycle through the service list.
fn seed_products(count: u64) -> Vec<Value> {
    let mut rng = StdRng::seed_from_u64(CATALOGUE_SEED);
    let coded = ProductCategory::all();
    (1..=count)
        .map(|id| {
            let index = (id - 1) as usize;
            let slug = SERVICE_CATEGORIES[index % SERVICE_CATEGORIES.len()];
            let category =
                ProductCategory::from_slug(slug).unwrap_or(coded[index % coded.len()]);
            let mut product = generate_product_in(&mut rng, category);
            product.id = id;
            product.category = slug.to_string();
            product.title = format!("{} item {id}", display_name(slug));
            product.to_value()
        })
        .collect()
}

fn display_name(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    limit: Option<usize>,
    skip: Option<usize>,
    select: Option<String>,
    sort_by: Option<String>,
    order: Option<String>,
    q: Option<String>,
}

fn not_found(id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": format!("Product with id '{id}' not found") })),
    )
        .into_response()
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response()
}

fn find<'a>(state: &'a FakeState, id: &str) -> Option<&'a Value> {
    let id: u64 = id.parse().ok()?;
    state
        .products
        .iter()
        .find(|product| product["id"].as_u64() == Some(id))
}

/// `{id}` plus the selected fields the product actually has.
fn project(product: &Value, select: Option<&str>) -> Value {
    let Some(select) = select else {
        return product.clone();
    };
    let mut projected = Map::new();
    projected.insert("id".to_string(), product["id"].clone());
    for field in select.split(',').map(str::trim).filter(|f| !f.is_empty()) {
        if let Some(value) = product.get(field) {
            projected.insert(field.to_string(), value.clone());
        }
    }
    Value::Object(projected)
}

/// The echoed `limit` is the number of items actually returned.
fn page(products: Vec<Value>, params: &ListParams) -> Value {
    let total = products.len();
    let skip = params.skip.unwrap_or(0);
    let rest = &products[skip.min(total)..];
    let take = match params.limit.unwrap_or(DEFAULT_LIMIT) {
        0 => rest.len(),
        limit => limit.min(rest.len()),
    };
    let window: Vec<Value> = rest[..take]
        .iter()
        .map(|product| project(product, params.select.as_deref()))
        .collect();
    json!({
        "products": window,
        "total": total,
        "skip": skip,
        "limit": take,
    })
}

async fn list_products(
    State(state): State<Arc<FakeState>>,
    Query(params): Query<ListParams>,
) -> Json<Value> {
    let mut products = state.products.clone();
    if let Some(field) = params.sort_by.as_deref() {
        let missing = Value::Null;
        products.sort_by(|a, b| {
            compare_sort_keys(a.get(field).unwrap_or(&missing), b.get(field).unwrap_or(&missing))
        });
        if params.order.as_deref() == Some("desc") {
            products.reverse();
        }
    }
    Json(page(products, &params))
}

async fn search_products(
    State(state): State<Arc<FakeState>>,
    Query(params): Query<ListParams>,
) -> Json<Value> {
    let term = params.q.clone().unwrap_or_default().to_lowercase();
    let hits: Vec<Value> = if term.is_empty() {
        if state.options.empty_search_returns_all {
            state.products.clone()
        } else {
            Vec::new()
        }
    } else {
        state
            .products
            .iter()
            .filter(|product| {
                ["title", "description"].iter().any(|field| {
                    product[*field]
                        .as_str()
                        .is_some_and(|text| text.to_lowercase().contains(&term))
                })
            })
            .cloned()
            .collect()
    };
    Json(page(hits, &params))
}

fn present_slugs(state: &FakeState) -> Vec<&'static str> {
    SERVICE_CATEGORIES
        .iter()
        .copied()
        .filter(|slug| {
            state
                .products
                .iter()
                .any(|product| product["category"].as_str() == Some(*slug))
        })
        .collect()
}

async fn categories(State(state): State<Arc<FakeState>>) -> Json<Value> {
    let entries: Vec<Value> = present_slugs(&state)
        .into_iter()
        .map(|slug| {
            json!({
                "slug": slug,
                "name": display_name(slug),
                "url": format!("{}/products/category/{slug}", state.base_url),
            })
        })
        .collect();
    Json(Value::Array(entries))
}

async fn category_list(State(state): State<Arc<FakeState>>) -> Json<Value> {
    Json(json!(present_slugs(&state)))
}

async fn empty_category() -> Json<Value> {
    Json(json!({ "products": [], "total": 0, "skip": 0, "limit": 0 }))
}

async fn products_in_category(
    State(state): State<Arc<FakeState>>,
    Path(slug): Path<String>,
    Query(params): Query<ListParams>,
) -> Json<Value> {
    let members: Vec<Value> = state
        .products
        .iter()
        .filter(|product| product["category"].as_str() == Some(slug.as_str()))
        .cloned()
        .collect();
    if members.is_empty() {
        return empty_category().await;
    }
    Json(page(members, &params))
}

async fn get_product(State(state): State<Arc<FakeState>>, Path(id): Path<String>) -> Response {
    match find(&state, &id) {
        Some(product) => Json(product.clone()).into_response(),
        None => not_found(&id),
    }
}

/// Business-rule check used in `reject_invalid` mode.
fn rule_violation(body: &Value) -> Option<String> {
    match serde_json::from_value::<ProductPayload>(body.clone()) {
        Ok(payload) => validate_create_payload(&payload).err().map(|f| f.to_string()),
        Err(err) => Some(format!("malformed product body: {err}")),
    }
}

async fn add_product(State(state): State<Arc<FakeState>>, Json(body): Json<Value>) -> Response {
    if state.options.reject_invalid {
        if let Some(message) = rule_violation(&body) {
            return bad_request(message);
        }
    }
    let mut created = Map::new();
    created.insert("id".to_string(), json!(state.products.len() + 1));
    if let Value::Object(fields) = body {
        created.extend(fields.into_iter().filter(|(key, _)| key != "id"));
    }
    (StatusCode::CREATED, Json(Value::Object(created))).into_response()
}

async fn update_product(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let Some(Value::Object(stored)) = find(&state, &id).cloned() else {
        return not_found(&id);
    };
    let mut merged = stored;
    if let Value::Object(fields) = body {
        merged.extend(fields.into_iter().filter(|(key, _)| key != "id"));
    }
    let merged = Value::Object(merged);
    if state.options.reject_invalid {
        if let Some(message) = rule_violation(&merged) {
            return bad_request(message);
        }
    }
    Json(merged).into_response()
}

async fn delete_product(State(state): State<Arc<FakeState>>, Path(id): Path<String>) -> Response {
    let Some(Value::Object(stored)) = find(&state, &id).cloned() else {
        return not_found(&id);
    };
    let mut receipt = stored;
    receipt.insert("isDeleted".to_string(), json!(true));
    receipt.insert(
        "deletedOn".to_string(),
        json!(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    Json(Value::Object(receipt)).into_response()
}
