//! Full synthetic products.
//!
//! `generate_product` fills every field of [`Product`] and keeps the
//! category-correlated fields consistent: tags come from the category's base
//! set (topped up from [`BONUS_TAGS`]) and the SKU starts with the category's
//! code.

use super::primitives::{
    pick, pick_str, random_date, random_date_between, random_digits, random_letters, round2,
    sample, to_iso8601,
};
use super::tables::{
    AVAILABILITY_STATUSES, BONUS_TAGS, FALLBACK_TAGS, FIRST_NAMES, IN_STOCK, IN_STOCK_BIAS,
    LAST_NAMES, MINIMUM_ORDER_QUANTITIES, PRODUCT_BRANDS, PRODUCT_IMAGE_BASE, ProductCategory,
    QR_CODE_URL, RETURN_POLICIES, REVIEW_COMMENTS, REVIEWER_EMAIL_DOMAIN, SHIPPING_OPTIONS,
    WARRANTIES,
};
use crate::error::HarnessResult;
use crate::model::{Dimensions, Product, ProductMeta, Review};
use chrono::{Duration, Utc};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

/// `AAA-BBB-CCC-###`
pub static SKU_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{3}-[A-Z]{3}-[A-Z]{3}-\d{3}$").expect("valid SKU regex"));

pub const MIN_TAGS: usize = 2;
pub const MAX_TAGS: usize = 4;
pub const MIN_REVIEWS: usize = 1;
pub const MAX_REVIEWS: usize = 5;
pub const MAX_IMAGES: usize = 3;
pub const BARCODE_LEN: usize = 13;

/// Largest synthetic identifier handed out by [`generate_product`].
pub const MAX_SYNTHETIC_ID: u64 = 9_999;

pub fn generate_product<R: Rng + ?Sized>(rng: &mut R) -> Product {
    let categories = ProductCategory::all();
    let category = categories[rng.gen_range(0..categories.len())];
    generate_product_in(rng, category)
}

/// Full product pinned to `category`.
pub fn generate_product_in<R: Rng + ?Sized>(rng: &mut R, category: ProductCategory) -> Product {
    let id = rng.gen_range(1..=MAX_SYNTHETIC_ID);
    let slug = category.slug().to_string();

    Product {
        id,
        title: format!("Test Product {id}"),
        description: format!("This is a test product description for product {id}"),
        price: f64::from(rng.gen_range(10..=1009u32)),
        discount_percentage: round2(rng.gen_range(0.0..50.0)),
        rating: round2(rng.gen_range(1.0..=5.0)),
        stock: rng.gen_range(1..=100),
        tags: generate_tags(rng, &slug),
        brand: pick_or_default(rng, PRODUCT_BRANDS),
        sku: sku_for(rng, category),
        weight: generate_weight(rng),
        dimensions: generate_dimensions(rng),
        warranty_information: pick_or_default(rng, WARRANTIES),
        shipping_information: pick_or_default(rng, SHIPPING_OPTIONS),
        availability_status: generate_availability_status(rng),
        reviews: generate_reviews(rng),
        return_policy: pick_or_default(rng, RETURN_POLICIES),
        minimum_order_quantity: generate_minimum_order_quantity(rng),
        meta: generate_meta(rng),
        images: generate_images(rng, id),
        thumbnail: thumbnail_url(id),
        category: slug,
    }
}

// Tables are non-empty constants, so the pick cannot fail.
fn pick_or_default<R: Rng + ?Sized>(rng: &mut R, table: &[&str]) -> String {
    pick_str(rng, table).unwrap_or_default()
}

/// Two to four tags for `category`.
///
/// Starts from the category's base set (or [`FALLBACK_TAGS`] for slugs without
/// one) and tops up from [`BONUS_TAGS`] when the drawn count exceeds it.
pub fn generate_tags<R: Rng + ?Sized>(rng: &mut R, category: &str) -> Vec<String> {
    let base = ProductCategory::from_slug(category)
        .map(|c| c.base_tags())
        .unwrap_or(FALLBACK_TAGS);
    let count = rng.gen_range(MIN_TAGS..=MAX_TAGS);

    let mut tags: Vec<String> = base.iter().map(|t| (*t).to_string()).collect();
    if count > tags.len() {
        let extra = sample(rng, BONUS_TAGS, count - tags.len());
        tags.extend(extra.into_iter().map(str::to_string));
    }
    tags.truncate(count);
    tags
}

/// SKU for a category slug; unknown slugs are an `InvalidArgument`.
pub fn generate_sku<R: Rng + ?Sized>(rng: &mut R, category: &str) -> HarnessResult<String> {
    let category = ProductCategory::from_slug(category)?;
    Ok(sku_for(rng, category))
}

pub fn sku_for<R: Rng + ?Sized>(rng: &mut R, category: ProductCategory) -> String {
    let group2 = random_letters(rng, 3);
    let group3 = random_letters(rng, 3);
    let number = rng.gen_range(1..=999u16);
    format!("{}-{group2}-{group3}-{number:03}", category.sku_code())
}

pub fn is_valid_sku(sku: &str) -> bool {
    SKU_PATTERN.is_match(sku)
}

/// Category code prefix of a well-formed SKU.
pub fn sku_category_code(sku: &str) -> Option<&str> {
    is_valid_sku(sku).then(|| &sku[..3])
}

pub fn generate_weight<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    round2(rng.gen_range(0.1..50.1))
}

pub fn generate_dimensions<R: Rng + ?Sized>(rng: &mut R) -> Dimensions {
    let mut side = || round2(rng.gen_range(1.0..51.0));
    Dimensions {
        width: side(),
        height: side(),
        depth: side(),
    }
}

/// Skewed toward "In Stock"; the remaining draw is uniform over all statuses.
pub fn generate_availability_status<R: Rng + ?Sized>(rng: &mut R) -> String {
    if rng.gen_bool(IN_STOCK_BIAS) {
        return IN_STOCK.to_string();
    }
    pick_or_default(rng, AVAILABILITY_STATUSES)
}

pub fn generate_minimum_order_quantity<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    pick(rng, MINIMUM_ORDER_QUANTITIES).copied().unwrap_or(1)
}

pub fn generate_reviews<R: Rng + ?Sized>(rng: &mut R) -> Vec<Review> {
    let count = rng.gen_range(MIN_REVIEWS..=MAX_REVIEWS);
    (0..count).map(|_| generate_review(rng)).collect()
}

pub fn generate_review<R: Rng + ?Sized>(rng: &mut R) -> Review {
    let first = pick_or_default(rng, FIRST_NAMES);
    let last = pick_or_default(rng, LAST_NAMES);
    Review {
        rating: rng.gen_range(1..=5),
        comment: pick_or_default(rng, REVIEW_COMMENTS),
        date: to_iso8601(random_date(rng)),
        reviewer_email: reviewer_email(&first, &last),
        reviewer_name: format!("{first} {last}"),
    }
}

/// `first.last@x.dummyjson.com`, lowercased.
pub fn reviewer_email(first: &str, last: &str) -> String {
    format!(
        "{}.{}@{REVIEWER_EMAIL_DOMAIN}",
        first.to_lowercase(),
        last.to_lowercase()
    )
}

/// `createdAt <= updatedAt <= now`, both inside the trailing year.
pub fn generate_meta<R: Rng + ?Sized>(rng: &mut R) -> ProductMeta {
    let now = Utc::now();
    let year_ago = now - Duration::days(365);
    let created = random_date_between(rng, year_ago, now).unwrap_or(year_ago);
    let updated = random_date_between(rng, created, now).unwrap_or(now);
    ProductMeta {
        created_at: to_iso8601(created),
        updated_at: to_iso8601(updated),
        barcode: random_digits(rng, BARCODE_LEN),
        qr_code: QR_CODE_URL.to_string(),
    }
}

pub fn generate_images<R: Rng + ?Sized>(rng: &mut R, product_id: u64) -> Vec<String> {
    let count = rng.gen_range(1..=MAX_IMAGES);
    (1..=count)
        .map(|n| format!("{PRODUCT_IMAGE_BASE}/test-product-{product_id}/{n}.webp"))
        .collect()
}

pub fn thumbnail_url(product_id: u64) -> String {
    format!("{PRODUCT_IMAGE_BASE}/test-product-{product_id}/thumbnail.webp")
}
