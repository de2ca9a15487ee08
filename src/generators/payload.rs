//! Request bodies for create, update and patch calls.
//!
//! These never carry an identifier or other server-assigned fields.

use super::primitives::{pick, pick_str, random_decimal, random_int, random_string, round2};
use super::product::{generate_tags, sku_for};
use super::tables::{
    DESCRIPTIONS, ProductCategory, REQUEST_BRANDS, REQUEST_IMAGE_BASE, SERVICE_CATEGORIES,
};
use crate::error::{HarnessError, HarnessResult};
use crate::model::ProductPayload;
use rand::Rng;
use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator};

/// Longest title the remote is documented to accept.
pub const MAX_TITLE_LEN: usize = 255;
/// Length of the title used by [`InvalidVariant::OversizedTitle`].
pub const OVERSIZED_TITLE_LEN: usize = 300;
pub const DEFAULT_TITLE_LEN: usize = 20;
pub const DEFAULT_PRICE_RANGE: PriceRange = PriceRange { min: 1.0, max: 999.0 };

/// Inclusive price bounds for generated bodies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> HarnessResult<Self> {
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
            return Err(HarnessError::invalid_argument(
                "price_range",
                format!("expected finite 0 < min <= max, got [{min}, {max}]"),
            ));
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        DEFAULT_PRICE_RANGE
    }
}

/// Well-formed body, or one with a single documented-bad field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Validity {
    #[default]
    Valid,
    Invalid,
}

/// Options recognised by [`generate_for_create`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateOptions {
    pub category: Option<String>,
    pub price_range: Option<PriceRange>,
    pub title_length: Option<usize>,
    pub validity: Validity,
}

impl CreateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn price_range(mut self, min: f64, max: f64) -> Self {
        self.price_range = Some(PriceRange { min, max });
        self
    }

    pub fn title_length(mut self, length: usize) -> Self {
        self.title_length = Some(length);
        self
    }

    pub fn invalid(mut self) -> Self {
        self.validity = Validity::Invalid;
        self
    }
}

/// Body for `POST /products/add` shaped by `options`.
///
/// A requested category must be one of [`ProductCategory`] since it drives the
/// SKU prefix and tag set; anything else is an `InvalidArgument`. With
/// `Validity::Invalid` the other options are ignored and a random
/// [`InvalidVariant`] is applied instead.
pub fn generate_for_create<R: Rng + ?Sized>(
    rng: &mut R,
    options: &CreateOptions,
) -> HarnessResult<ProductPayload> {
    if options.validity == Validity::Invalid {
        return Ok(generate_invalid(rng).payload);
    }

    let category = match options.category.as_deref() {
        Some(slug) => ProductCategory::from_slug(slug)?,
        None => *pick(rng, &ProductCategory::all())?,
    };
    let range = match options.price_range {
        Some(range) => PriceRange::new(range.min, range.max)?,
        None => PriceRange::default(),
    };
    let title_length = options.title_length.unwrap_or(DEFAULT_TITLE_LEN);

    Ok(ProductPayload {
        title: Some(random_string(rng, title_length)?),
        description: Some(format!("Test product description for {category} category")),
        price: Some(random_decimal(rng, range.min, range.max)?),
        discount_percentage: Some(round2(rng.gen_range(0.0..30.0))),
        rating: Some(round2(rng.gen_range(1.0..=5.0))),
        stock: Some(random_int(rng, 10, 59)?),
        brand: Some(pick_str(rng, REQUEST_BRANDS)?),
        category: Some(category.slug().to_string()),
        tags: Some(generate_tags(rng, category.slug())),
        sku: Some(sku_for(rng, category)),
        thumbnail: Some(random_image_url(rng)?),
        images: Some(random_image_urls(rng, 2)?),
        ..Default::default()
    })
}

/// Fully random create body over every service category.
pub fn random_product_for_post<R: Rng + ?Sized>(rng: &mut R) -> HarnessResult<ProductPayload> {
    let title = format!(
        "{} Product {}",
        random_string(rng, 8)?,
        rng.gen_range(0..1000)
    );
    Ok(ProductPayload {
        title: Some(title),
        description: Some(pick_str(rng, DESCRIPTIONS)?),
        price: Some(random_decimal(rng, 1.0, 999.99)?),
        discount_percentage: Some(round2(rng.gen_range(0.0..50.0))),
        rating: Some(round2(rng.gen_range(1.0..=5.0))),
        stock: Some(random_int(rng, 1, 100)?),
        brand: Some(pick_str(rng, REQUEST_BRANDS)?),
        category: Some(pick_str(rng, SERVICE_CATEGORIES)?),
        thumbnail: Some(random_image_url(rng)?),
        images: Some(random_image_urls(rng, 2)?),
        ..Default::default()
    })
}

/// Smaller body for `PATCH`: title, description, price, category and images.
pub fn random_product_for_patch<R: Rng + ?Sized>(rng: &mut R) -> HarnessResult<ProductPayload> {
    let full = random_product_for_post(rng)?;
    Ok(full.retain_fields(&["title", "description", "price", "category", "thumbnail", "images"]))
}

pub fn random_image_url<R: Rng + ?Sized>(rng: &mut R) -> HarnessResult<String> {
    Ok(format!("{REQUEST_IMAGE_BASE}/{}.jpg", random_string(rng, 7)?))
}

pub fn random_image_urls<R: Rng + ?Sized>(rng: &mut R, count: usize) -> HarnessResult<Vec<String>> {
    (0..count).map(|_| random_image_url(rng)).collect()
}

// =============================================================================
// Invalid bodies
// =============================================================================

/// The catalogue of single-field corruptions used for negative tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "snake_case")]
pub enum InvalidVariant {
    EmptyTitle,
    OversizedTitle,
    NegativePrice,
    ZeroPrice,
    NegativeStock,
    RatingAboveRange,
    RatingBelowRange,
    NegativeDiscount,
    DiscountAboveRange,
    UnknownCategory,
    EmptyBrand,
    EmptyPayload,
}

impl InvalidVariant {
    pub fn all() -> Vec<InvalidVariant> {
        InvalidVariant::iter().collect()
    }

    /// Wire field the variant corrupts; `None` for the empty payload.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            InvalidVariant::EmptyTitle | InvalidVariant::OversizedTitle => Some("title"),
            InvalidVariant::NegativePrice | InvalidVariant::ZeroPrice => Some("price"),
            InvalidVariant::NegativeStock => Some("stock"),
            InvalidVariant::RatingAboveRange | InvalidVariant::RatingBelowRange => Some("rating"),
            InvalidVariant::NegativeDiscount | InvalidVariant::DiscountAboveRange => {
                Some("discountPercentage")
            }
            InvalidVariant::UnknownCategory => Some("category"),
            InvalidVariant::EmptyBrand => Some("brand"),
            InvalidVariant::EmptyPayload => None,
        }
    }

    /// Apply the corruption to a well-formed base body.
    pub fn apply(&self, base: ProductPayload) -> ProductPayload {
        let mut payload = base;
        match self {
            InvalidVariant::EmptyTitle => payload.title = Some(String::new()),
            InvalidVariant::OversizedTitle => payload.title = Some("A".repeat(OVERSIZED_TITLE_LEN)),
            InvalidVariant::NegativePrice => payload.price = Some(-10.0),
            InvalidVariant::ZeroPrice => payload.price = Some(0.0),
            InvalidVariant::NegativeStock => payload.stock = Some(-5),
            InvalidVariant::RatingAboveRange => payload.rating = Some(6.0),
            InvalidVariant::RatingBelowRange => payload.rating = Some(-1.0),
            InvalidVariant::NegativeDiscount => payload.discount_percentage = Some(-10.0),
            InvalidVariant::DiscountAboveRange => payload.discount_percentage = Some(101.0),
            InvalidVariant::UnknownCategory => payload.category = Some("invalid-category".into()),
            InvalidVariant::EmptyBrand => payload.brand = Some(String::new()),
            InvalidVariant::EmptyPayload => payload = ProductPayload::default(),
        }
        payload
    }
}

/// An invalid body together with the corruption that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidPayload {
    pub variant: InvalidVariant,
    pub payload: ProductPayload,
}

/// Well-formed random body with exactly one random corruption applied.
pub fn generate_invalid<R: Rng + ?Sized>(rng: &mut R) -> InvalidPayload {
    let variants = InvalidVariant::all();
    let variant = variants[rng.gen_range(0..variants.len())];
    generate_invalid_with(rng, variant)
}

pub fn generate_invalid_with<R: Rng + ?Sized>(rng: &mut R, variant: InvalidVariant) -> InvalidPayload {
    let base = random_product_for_post(rng).unwrap_or_default();
    InvalidPayload {
        variant,
        payload: variant.apply(base),
    }
}
