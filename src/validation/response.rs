//! Structural and semantic checks applied to API response bodies.
//!
//! Every check returns [`CheckResult`]: `Ok(())` when the contract holds and an
//! [`AssertionFailure`] naming the violated field and expectation otherwise.
//! Checks never panic on malformed input; a missing or mistyped field is just
//! another failure.

use crate::error::AssertionFailure;
use crate::model::{PaginationParams, SortOrder};
use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt::Display;

/// Result type for validator checks
pub type CheckResult = Result<(), AssertionFailure>;

/// Leading `YYYY-MM-DDTHH:MM:SS` of an ISO-8601 timestamp.
static ISO_8601_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}").expect("valid iso regex"));

static CATEGORY_SLUG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9-]*[a-z0-9]$").expect("valid slug regex"));

/// Canonical category URL: `http(s)://<host>/products/category/<slug>`.
static CATEGORY_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[^/\s]+(?:/[^\s]*)?/products/category/([\w-]+)$")
        .expect("valid category url regex")
});

/// Required keys of the pagination envelope.
pub const PAGINATION_FIELDS: &[&str] = &["total", "skip", "limit", "products"];

/// Required keys of a full product record.
pub const PRODUCT_FIELDS: &[&str] = &["id", "title", "description", "price", "stock", "category"];

/// Required keys of a category entry.
pub const CATEGORY_FIELDS: &[&str] = &["slug", "name", "url"];

// =============================================================================
// Helpers
// =============================================================================

fn fail(
    check: &'static str,
    context: impl Into<String>,
    expected: impl Into<String>,
    actual: impl Into<String>,
) -> AssertionFailure {
    let failure = AssertionFailure::new(check, context, expected, actual);
    tracing::debug!(
        check = failure.check,
        context = %failure.context,
        expected = %failure.expected,
        actual = %failure.actual,
        "validation check failed"
    );
    failure
}

/// Short JSON type name used in failure messages.
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn as_object<'a>(
    check: &'static str,
    context: &str,
    value: &'a Value,
) -> Result<&'a Map<String, Value>, AssertionFailure> {
    value
        .as_object()
        .ok_or_else(|| fail(check, context, "an object", type_name(value)))
}

fn number_field(
    check: &'static str,
    object: &Map<String, Value>,
    context: &str,
    field: &str,
) -> Result<f64, AssertionFailure> {
    let path = format!("{context}.{field}");
    match object.get(field) {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| fail(check, &path, "a finite number", n.to_string())),
        Some(other) => Err(fail(check, path, "a number", type_name(other))),
        None => Err(fail(check, path, "field to be present", "missing")),
    }
}

fn string_field<'a>(
    check: &'static str,
    object: &'a Map<String, Value>,
    context: &str,
    field: &str,
) -> Result<&'a str, AssertionFailure> {
    let path = format!("{context}.{field}");
    match object.get(field) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(fail(check, path, "a string", type_name(other))),
        None => Err(fail(check, path, "field to be present", "missing")),
    }
}

fn non_empty_string_field<'a>(
    check: &'static str,
    object: &'a Map<String, Value>,
    context: &str,
    field: &str,
) -> Result<&'a str, AssertionFailure> {
    let value = string_field(check, object, context, field)?;
    if value.is_empty() {
        return Err(fail(check, format!("{context}.{field}"), "a non-empty string", "\"\""));
    }
    Ok(value)
}

// =============================================================================
// Status codes
// =============================================================================

pub fn validate_status_code(actual: u16, expected: u16) -> CheckResult {
    if actual == expected {
        Ok(())
    } else {
        Err(fail(
            "status_code",
            "response.status",
            expected.to_string(),
            actual.to_string(),
        ))
    }
}

/// Tolerant status check used by negative-path scenarios.
pub fn validate_status_one_of(actual: u16, accepted: &[u16]) -> CheckResult {
    if accepted.contains(&actual) {
        Ok(())
    } else {
        Err(fail(
            "status_one_of",
            "response.status",
            format!("one of {accepted:?}"),
            actual.to_string(),
        ))
    }
}

// =============================================================================
// Generic shape
// =============================================================================

/// Checks that `body` is an object carrying every key in `required`.
pub fn validate_response_structure(body: &Value, required: &[&str]) -> CheckResult {
    let object = as_object("response_structure", "body", body)?;
    match required.iter().find(|key| !object.contains_key(**key)) {
        Some(missing) => Err(fail(
            "response_structure",
            format!("body.{missing}"),
            "property to be present",
            format!("missing (have: {})", keys_of(object).join(", ")),
        )),
        None => Ok(()),
    }
}

pub fn validate_array_response(body: &Value, min_len: usize) -> CheckResult {
    let items = body
        .as_array()
        .ok_or_else(|| fail("array_response", "body", "an array", type_name(body)))?;
    if items.len() < min_len {
        return Err(fail(
            "array_response",
            "body.length",
            format!("at least {min_len}"),
            items.len().to_string(),
        ));
    }
    Ok(())
}

/// Pagination envelope: `total`, `skip`, `limit` and `products` present and
/// typed, `skip >= 0`, `limit > 0`, and `total > 0` unless `allow_empty`,
/// in which case `total >= 0` and `limit == 0` is accepted as well.
///
/// # Examples
///
/// ```
/// use product_api_harness::validation::validate_pagination_structure;
/// use serde_json::json;
///
/// let empty = json!({"total": 0, "skip": 0, "limit": 0, "products": []});
/// assert!(validate_pagination_structure(&empty, true).is_ok());
/// assert!(validate_pagination_structure(&empty, false).is_err());
/// ```
pub fn validate_pagination_structure(body: &Value, allow_empty: bool) -> CheckResult {
    const CHECK: &str = "pagination_structure";
    validate_response_structure(body, PAGINATION_FIELDS)?;
    let object = as_object(CHECK, "body", body)?;

    let total = number_field(CHECK, object, "body", "total")?;
    if allow_empty && total < 0.0 {
        return Err(fail(CHECK, "body.total", ">= 0", total.to_string()));
    }
    if !allow_empty && total <= 0.0 {
        return Err(fail(CHECK, "body.total", "> 0", total.to_string()));
    }

    let skip = number_field(CHECK, object, "body", "skip")?;
    if skip < 0.0 {
        return Err(fail(CHECK, "body.skip", ">= 0", skip.to_string()));
    }

    let limit = number_field(CHECK, object, "body", "limit")?;
    let limit_ok = if allow_empty { limit >= 0.0 } else { limit > 0.0 };
    if !limit_ok {
        let expected = if allow_empty { ">= 0" } else { "> 0" };
        return Err(fail(CHECK, "body.limit", expected, limit.to_string()));
    }

    let products = &object["products"];
    let items = products
        .as_array()
        .ok_or_else(|| fail(CHECK, "body.products", "an array", type_name(products)))?;
    if limit > 0.0 && items.len() as f64 > limit {
        return Err(fail(
            CHECK,
            "body.products.length",
            format!("<= limit ({limit})"),
            items.len().to_string(),
        ));
    }
    Ok(())
}

/// Page window for a `limit`/`skip` request against a dense 1-based id space.
///
/// The page holds `min(limit, total - skip)` items, echoes that effective
/// limit and `skip`, and when non-empty starts at id `skip + 1`. Away from the
/// tail the effective limit is the requested one. A zero limit means
/// "everything" on the remote, so the count and echo checks are skipped.
pub fn validate_page_window(body: &Value, requested: PaginationParams) -> CheckResult {
    const CHECK: &str = "page_window";
    let object = as_object(CHECK, "body", body)?;
    let total = number_field(CHECK, object, "body", "total")? as u64;
    let products = object
        .get("products")
        .and_then(Value::as_array)
        .ok_or_else(|| fail(CHECK, "body.products", "an array", "missing or mistyped"))?;

    if requested.limit > 0 {
        let expected = requested.limit.min(total.saturating_sub(requested.skip));
        if products.len() as u64 != expected {
            return Err(fail(
                CHECK,
                "body.products.length",
                format!("{expected} (limit {} or remaining items)", requested.limit),
                products.len().to_string(),
            ));
        }
        let limit = number_field(CHECK, object, "body", "limit")? as u64;
        if limit != expected {
            return Err(fail(CHECK, "body.limit", expected.to_string(), limit.to_string()));
        }
    }

    if let Some(first) = products.first() {
        let first_id = first.get("id").and_then(Value::as_u64);
        let expected_id = requested.skip + 1;
        if first_id != Some(expected_id) {
            return Err(fail(
                CHECK,
                "body.products[0].id",
                format!("{expected_id} (skip {} + 1)", requested.skip),
                first_id.map_or_else(|| "missing".to_string(), |id| id.to_string()),
            ));
        }
        let skip = number_field(CHECK, object, "body", "skip")? as u64;
        if skip != requested.skip {
            return Err(fail(CHECK, "body.skip", requested.skip.to_string(), skip.to_string()));
        }
    }
    Ok(())
}

/// Ordering used for `sortBy`: numbers numerically, strings case-insensitively.
pub fn compare_sort_keys(left: &Value, right: &Value) -> std::cmp::Ordering {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(std::cmp::Ordering::Equal),
        (Value::String(a), Value::String(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
        _ => std::cmp::Ordering::Equal,
    }
}

/// Products in `body.products` are ordered by `field` in `order`.
pub fn validate_sorted_by(body: &Value, field: &str, order: SortOrder) -> CheckResult {
    const CHECK: &str = "sorted_by";
    let products = body
        .get("products")
        .and_then(Value::as_array)
        .ok_or_else(|| fail(CHECK, "body.products", "an array", "missing or mistyped"))?;
    let missing = Value::Null;
    for (index, pair) in products.windows(2).enumerate() {
        let a = pair[0].get(field).unwrap_or(&missing);
        let b = pair[1].get(field).unwrap_or(&missing);
        let ordering = compare_sort_keys(a, b);
        let in_order = match order {
            SortOrder::Asc => ordering != std::cmp::Ordering::Greater,
            SortOrder::Desc => ordering != std::cmp::Ordering::Less,
        };
        if !in_order {
            return Err(fail(
                CHECK,
                format!("body.products[{}].{field}", index + 1),
                format!("{order} order after {a}"),
                b.to_string(),
            ));
        }
    }
    Ok(())
}

// =============================================================================
// Entities
// =============================================================================

/// Minimal product contract: numeric `id`, non-empty `title`, string
/// `description`, `price > 0`, `stock >= 0`, non-empty `category`.
pub fn validate_product_structure(product: &Value) -> CheckResult {
    const CHECK: &str = "product_structure";
    validate_response_structure(product, PRODUCT_FIELDS)?;
    let object = as_object(CHECK, "product", product)?;

    number_field(CHECK, object, "product", "id")?;
    non_empty_string_field(CHECK, object, "product", "title")?;
    string_field(CHECK, object, "product", "description")?;

    let price = number_field(CHECK, object, "product", "price")?;
    if price <= 0.0 {
        return Err(fail(CHECK, "product.price", "> 0", price.to_string()));
    }
    let stock = number_field(CHECK, object, "product", "stock")?;
    if stock < 0.0 {
        return Err(fail(CHECK, "product.stock", ">= 0", stock.to_string()));
    }
    non_empty_string_field(CHECK, object, "product", "category")?;
    Ok(())
}

/// Field-selection responses carry exactly `{id} ∪ selected`.
pub fn validate_selected_fields(product: &Value, selected: &[&str]) -> CheckResult {
    const CHECK: &str = "selected_fields";
    let object = as_object(CHECK, "product", product)?;

    let mut expected: BTreeSet<&str> = selected.iter().map(|f| f.trim()).collect();
    expected.insert("id");
    let actual: BTreeSet<&str> = object.keys().map(String::as_str).collect();

    if let Some(missing) = expected.iter().find(|f| !actual.contains(*f)) {
        return Err(fail(
            CHECK,
            format!("product.{missing}"),
            format!("exactly [{}]", join(&expected)),
            format!("missing field '{missing}' (have: {})", join(&actual)),
        ));
    }
    if let Some(extra) = actual.iter().find(|f| !expected.contains(*f)) {
        return Err(fail(
            CHECK,
            format!("product.{extra}"),
            format!("exactly [{}]", join(&expected)),
            format!("unexpected field '{extra}' (have: {})", join(&actual)),
        ));
    }
    if let Some((field, _)) = object.iter().find(|(_, v)| v.is_null()) {
        return Err(fail(CHECK, format!("product.{field}"), "a value", "null"));
    }
    Ok(())
}

/// Every field sent in `sent` except `id` is echoed unchanged in `received`.
pub fn validate_fields_reflected(sent: &Value, received: &Value) -> CheckResult {
    const CHECK: &str = "fields_reflected";
    let sent = as_object(CHECK, "request", sent)?;
    let received = as_object(CHECK, "response", received)?;

    for (key, value) in sent.iter().filter(|(key, _)| key.as_str() != "id") {
        match received.get(key) {
            Some(echoed) if json_eq(echoed, value) => {}
            Some(echoed) => {
                return Err(fail(CHECK, format!("response.{key}"), value.to_string(), echoed.to_string()));
            }
            None => {
                return Err(fail(CHECK, format!("response.{key}"), value.to_string(), "missing"));
            }
        }
    }
    Ok(())
}

/// Deep equality that treats `10` and `10.0` as the same number.
fn json_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| json_eq(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, v)| b.get(k).is_some_and(|other| json_eq(v, other)))
        }
        _ => left == right,
    }
}

/// `id` equal to `expected_id`, `isDeleted == true` and a `deletedOn` stamp.
pub fn validate_delete_receipt(body: &Value, expected_id: u64) -> CheckResult {
    const CHECK: &str = "delete_receipt";
    let object = as_object(CHECK, "body", body)?;

    let id = object.get("id").and_then(Value::as_u64);
    if id != Some(expected_id) {
        return Err(fail(
            CHECK,
            "body.id",
            expected_id.to_string(),
            id.map_or_else(|| "missing".to_string(), |id| id.to_string()),
        ));
    }
    match object.get("isDeleted") {
        Some(Value::Bool(true)) => {}
        Some(other) => return Err(fail(CHECK, "body.isDeleted", "true", other.to_string())),
        None => return Err(fail(CHECK, "body.isDeleted", "true", "missing")),
    }
    if !object.contains_key("deletedOn") {
        return Err(fail(CHECK, "body.deletedOn", "field to be present", "missing"));
    }
    Ok(())
}

/// The search term appears in the title or description (case-insensitive).
pub fn validate_search_hit(product: &Value, term: &str) -> CheckResult {
    const CHECK: &str = "search_hit";
    let object = as_object(CHECK, "product", product)?;
    let needle = term.to_lowercase();
    let hit = ["title", "description"].iter().any(|field| {
        object
            .get(*field)
            .and_then(Value::as_str)
            .is_some_and(|text| text.to_lowercase().contains(&needle))
    });
    if hit {
        Ok(())
    } else {
        let title = object.get("title").and_then(Value::as_str).unwrap_or("<none>");
        Err(fail(
            CHECK,
            "product.title|description",
            format!("to contain '{term}'"),
            format!("title '{title}'"),
        ))
    }
}

pub fn validate_category_slug(slug: &str) -> CheckResult {
    if CATEGORY_SLUG.is_match(slug) {
        Ok(())
    } else {
        Err(fail(
            "category_slug",
            "category",
            "slug matching ^[a-z][a-z0-9-]*[a-z0-9]$",
            format!("'{slug}'"),
        ))
    }
}

/// `{slug, name, url}` all non-empty strings, and the URL is the canonical
/// category URL ending in that slug.
pub fn validate_category_entry(entry: &Value) -> CheckResult {
    const CHECK: &str = "category_entry";
    validate_response_structure(entry, CATEGORY_FIELDS)?;
    let object = as_object(CHECK, "category", entry)?;

    let slug = non_empty_string_field(CHECK, object, "category", "slug")?;
    non_empty_string_field(CHECK, object, "category", "name")?;
    let url = non_empty_string_field(CHECK, object, "category", "url")?;

    let url_slug = CATEGORY_URL
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str());
    match url_slug {
        Some(found) if found == slug => Ok(()),
        Some(found) => Err(fail(
            CHECK,
            "category.url",
            format!("to end with /products/category/{slug}"),
            format!("slug '{found}' in {url}"),
        )),
        None => Err(fail(
            CHECK,
            "category.url",
            "http(s)://<host>/products/category/<slug>",
            url.to_string(),
        )),
    }
}

// =============================================================================
// Errors and scalars
// =============================================================================

/// Error envelope: a string `message`, optionally containing `expected`.
pub fn validate_error_response(body: &Value, expected: Option<&str>) -> CheckResult {
    const CHECK: &str = "error_response";
    let object = as_object(CHECK, "body", body)?;
    let message = string_field(CHECK, object, "body", "message")?;
    if let Some(expected) = expected {
        if !message.contains(expected) {
            return Err(fail(
                CHECK,
                "body.message",
                format!("to contain '{expected}'"),
                format!("'{message}'"),
            ));
        }
    }
    Ok(())
}

/// Accepted phrasings of the remote's "not found" message.
pub fn not_found_phrasings(entity_type: &str, id: impl Display) -> [String; 4] {
    [
        format!("{entity_type} with id {id} not found"),
        format!("{entity_type} with id '{id}' not found"),
        format!("{entity_type} with id \"{id}\" not found"),
        format!("{entity_type} with {id} not found"),
    ]
}

/// Matches `message` against the accepted "not found" phrasings for the entity.
///
/// # Examples
///
/// ```
/// use product_api_harness::validation::validate_not_found_message;
///
/// assert!(validate_not_found_message("Product with id '42' not found", "Product", 42).is_ok());
/// assert!(validate_not_found_message("Product 42 missing", "Product", 42).is_err());
/// ```
pub fn validate_not_found_message(message: &str, entity_type: &str, id: impl Display) -> CheckResult {
    let phrasings = not_found_phrasings(entity_type, id);
    if phrasings.iter().any(|p| message.contains(p.as_str())) {
        Ok(())
    } else {
        Err(fail(
            "not_found_message",
            "body.message",
            format!("one of: {}", phrasings.join(" OR ")),
            format!("'{message}'"),
        ))
    }
}

/// Same as [`validate_not_found_message`] but reads `message` out of a body.
pub fn validate_not_found_body(body: &Value, entity_type: &str, id: impl Display) -> CheckResult {
    let object = as_object("not_found_message", "body", body)?;
    let message = string_field("not_found_message", object, "body", "message")?;
    validate_not_found_message(message, entity_type, id)
}

/// `YYYY-MM-DDTHH:MM:SS...` prefix and parseable as RFC 3339.
pub fn validate_date_format(value: &str) -> CheckResult {
    const CHECK: &str = "date_format";
    if !ISO_8601_PREFIX.is_match(value) {
        return Err(fail(CHECK, "date", "ISO-8601 timestamp", format!("'{value}'")));
    }
    DateTime::parse_from_rfc3339(value)
        .map(|_| ())
        .map_err(|err| fail(CHECK, "date", "a parseable timestamp", format!("'{value}' ({err})")))
}

/// Inclusive range membership.
pub fn validate_numeric_range(context: &str, value: f64, min: f64, max: f64) -> CheckResult {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(fail(
            "numeric_range",
            context,
            format!("within [{min}, {max}]"),
            value.to_string(),
        ))
    }
}

fn keys_of(object: &Map<String, Value>) -> Vec<&str> {
    object.keys().map(String::as_str).collect()
}

fn join(set: &BTreeSet<&str>) -> String {
    set.iter().copied().collect::<Vec<_>>().join(", ")
}
