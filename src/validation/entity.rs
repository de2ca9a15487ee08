//! Consistency checks for locally generated entities.
//!
//! These run against typed values rather than response bodies: they confirm
//! that what the generators produce honours the same contract the remote
//! service is held to, plus the cross-field rules only the generator knows
//! about (SKU prefix, tag sets, meta ordering).

use super::response::{CheckResult, validate_date_format, validate_numeric_range};
use crate::error::AssertionFailure;
use crate::generators::payload::MAX_TITLE_LEN;
use crate::generators::product::{
    BARCODE_LEN, MAX_IMAGES, MAX_REVIEWS, MAX_TAGS, MIN_REVIEWS, MIN_TAGS, reviewer_email,
    sku_category_code,
};
use crate::generators::tables::{BONUS_TAGS, ProductCategory, SERVICE_CATEGORIES};
use crate::model::{Product, ProductPayload};
use chrono::{DateTime, Utc};

fn fail(
    check: &'static str,
    context: impl Into<String>,
    expected: impl Into<String>,
    actual: impl Into<String>,
) -> AssertionFailure {
    let failure = AssertionFailure::new(check, context, expected, actual);
    tracing::debug!(check, context = %failure.context, "entity check failed");
    failure
}

fn in_count_range(check: &'static str, context: &str, len: usize, min: usize, max: usize) -> CheckResult {
    if (min..=max).contains(&len) {
        Ok(())
    } else {
        Err(fail(check, context, format!("{min}..={max} entries"), len.to_string()))
    }
}

/// Full internal consistency of a generated [`Product`].
pub fn validate_generated_product(product: &Product) -> CheckResult {
    const CHECK: &str = "generated_product";

    if product.id == 0 {
        return Err(fail(CHECK, "product.id", "a positive integer", "0"));
    }
    if product.title.is_empty() {
        return Err(fail(CHECK, "product.title", "a non-empty string", "\"\""));
    }
    if product.price <= 0.0 {
        return Err(fail(CHECK, "product.price", "> 0", product.price.to_string()));
    }
    if product.stock < 0 {
        return Err(fail(CHECK, "product.stock", ">= 0", product.stock.to_string()));
    }
    validate_numeric_range("product.discountPercentage", product.discount_percentage, 0.0, 100.0)?;
    validate_numeric_range("product.rating", product.rating, 0.0, 5.0)?;
    if product.weight <= 0.0 {
        return Err(fail(CHECK, "product.weight", "> 0", product.weight.to_string()));
    }
    let d = product.dimensions;
    if d.width <= 0.0 || d.height <= 0.0 || d.depth <= 0.0 {
        return Err(fail(CHECK, "product.dimensions", "all sides > 0", format!("{d:?}")));
    }

    validate_category_fields(product)?;

    in_count_range(CHECK, "product.reviews", product.reviews.len(), MIN_REVIEWS, MAX_REVIEWS)?;
    for (index, review) in product.reviews.iter().enumerate() {
        let context = format!("product.reviews[{index}]");
        if !(1..=5).contains(&review.rating) {
            return Err(fail(CHECK, format!("{context}.rating"), "1..=5", review.rating.to_string()));
        }
        validate_date_format(&review.date)?;
        let (first, last) = review.reviewer_name.split_once(' ').unwrap_or((review.reviewer_name.as_str(), ""));
        let expected_email = reviewer_email(first, last);
        if review.reviewer_email != expected_email {
            return Err(fail(
                CHECK,
                format!("{context}.reviewerEmail"),
                expected_email,
                review.reviewer_email.clone(),
            ));
        }
    }

    validate_meta(product)?;
    in_count_range(CHECK, "product.images", product.images.len(), 1, MAX_IMAGES)?;
    if product.thumbnail.is_empty() {
        return Err(fail(CHECK, "product.thumbnail", "a URL", "\"\""));
    }
    Ok(())
}

/// Tags and SKU agree with the product's category.
fn validate_category_fields(product: &Product) -> CheckResult {
    const CHECK: &str = "category_correlation";
    let category = ProductCategory::from_slug(&product.category).map_err(|_| {
        fail(CHECK, "product.category", "a category with a SKU code", product.category.clone())
    })?;

    match sku_category_code(&product.sku) {
        Some(code) if code == category.sku_code() => {}
        Some(code) => {
            return Err(fail(CHECK, "product.sku", format!("prefix {}", category.sku_code()), code.to_string()));
        }
        None => {
            return Err(fail(CHECK, "product.sku", "AAA-BBB-CCC-###", product.sku.clone()));
        }
    }

    in_count_range(CHECK, "product.tags", product.tags.len(), MIN_TAGS, MAX_TAGS)?;
    let base = category.base_tags();
    if let Some(tag) = product
        .tags
        .iter()
        .find(|tag| !base.contains(&tag.as_str()) && !BONUS_TAGS.contains(&tag.as_str()))
    {
        return Err(fail(
            CHECK,
            "product.tags",
            format!("tags from {base:?} or {BONUS_TAGS:?}"),
            format!("'{tag}'"),
        ));
    }
    Ok(())
}

fn validate_meta(product: &Product) -> CheckResult {
    const CHECK: &str = "meta";
    let parse = |field: &str, value: &str| -> Result<DateTime<Utc>, AssertionFailure> {
        validate_date_format(value)?;
        DateTime::parse_from_rfc3339(value)
            .map(|instant| instant.with_timezone(&Utc))
            .map_err(|err| fail(CHECK, format!("product.meta.{field}"), "RFC 3339", err.to_string()))
    };
    let created = parse("createdAt", &product.meta.created_at)?;
    let updated = parse("updatedAt", &product.meta.updated_at)?;

    if created > updated {
        return Err(fail(
            CHECK,
            "product.meta",
            "createdAt <= updatedAt",
            format!("{} > {}", product.meta.created_at, product.meta.updated_at),
        ));
    }
    if updated > Utc::now() {
        return Err(fail(CHECK, "product.meta.updatedAt", "not in the future", product.meta.updated_at.clone()));
    }
    let barcode = &product.meta.barcode;
    if barcode.len() != BARCODE_LEN || !barcode.chars().all(|c| c.is_ascii_digit()) {
        return Err(fail(
            CHECK,
            "product.meta.barcode",
            format!("{BARCODE_LEN} digits"),
            barcode.clone(),
        ));
    }
    Ok(())
}

/// Business rules a create/update body should satisfy for the service to
/// accept it. Fields absent from the body are not checked, but an empty body
/// is rejected.
pub fn validate_create_payload(payload: &ProductPayload) -> CheckResult {
    const CHECK: &str = "create_payload";

    if payload.is_empty() {
        return Err(fail(CHECK, "payload", "at least one field", "{}"));
    }
    if let Some(title) = &payload.title {
        let len = title.chars().count();
        if len == 0 || len > MAX_TITLE_LEN {
            return Err(fail(CHECK, "payload.title", format!("1..={MAX_TITLE_LEN} characters"), len.to_string()));
        }
    }
    if let Some(price) = payload.price {
        if price.is_nan() || price <= 0.0 {
            return Err(fail(CHECK, "payload.price", "> 0", price.to_string()));
        }
    }
    if let Some(stock) = payload.stock {
        if stock < 0 {
            return Err(fail(CHECK, "payload.stock", ">= 0", stock.to_string()));
        }
    }
    if let Some(rating) = payload.rating {
        validate_numeric_range("payload.rating", rating, 0.0, 5.0)?;
    }
    if let Some(discount) = payload.discount_percentage {
        validate_numeric_range("payload.discountPercentage", discount, 0.0, 100.0)?;
    }
    if let Some(category) = &payload.category {
        if !SERVICE_CATEGORIES.contains(&category.as_str()) {
            return Err(fail(CHECK, "payload.category", "a known category slug", format!("'{category}'")));
        }
    }
    if let Some(brand) = &payload.brand {
        if brand.is_empty() {
            return Err(fail(CHECK, "payload.brand", "a non-empty string", "\"\""));
        }
    }
    if let Some(tags) = &payload.tags {
        if tags.iter().any(String::is_empty) {
            return Err(fail(CHECK, "payload.tags", "non-empty tags", format!("{tags:?}")));
        }
        if tags.len() > MAX_TAGS {
            return Err(fail(CHECK, "payload.tags", format!("at most {MAX_TAGS}"), tags.len().to_string()));
        }
    }
    Ok(())
}
