//! Phrase and category tables used by the entity generators.
//!
//! All enumerated text lives here as data so generators only ever pick from
//! these slices.

use crate::error::{HarnessError, HarnessResult};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Categories that carry a fixed SKU code and a base tag set.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter, EnumString,
)]
#[strum(serialize_all = "kebab-case")]
pub enum ProductCategory {
    Beauty,
    Fragrances,
    Furniture,
    HomeDecoration,
    KitchenAccessories,
    Laptops,
    MensShirts,
    MensShoes,
    Smartphones,
    WomensDresses,
}

impl ProductCategory {
    /// Resolve a slug, failing with `InvalidArgument` outside the enumeration.
    pub fn from_slug(slug: &str) -> HarnessResult<Self> {
        slug.parse().map_err(|_| {
            HarnessError::invalid_argument(
                "category",
                format!("unknown category '{slug}' (no SKU code registered)"),
            )
        })
    }

    pub fn slug(&self) -> &str {
        self.as_ref()
    }

    /// Fixed three-letter SKU prefix.
    pub fn sku_code(&self) -> &'static str {
        match self {
            ProductCategory::Beauty => "BEA",
            ProductCategory::Fragrances => "FRA",
            ProductCategory::Furniture => "FUR",
            ProductCategory::HomeDecoration => "HOM",
            ProductCategory::KitchenAccessories => "KIT",
            ProductCategory::Laptops => "LAP",
            ProductCategory::MensShirts => "MEN",
            ProductCategory::MensShoes => "SHO",
            ProductCategory::Smartphones => "SMT",
            ProductCategory::WomensDresses => "WOM",
        }
    }

    pub fn base_tags(&self) -> &'static [&'static str] {
        match self {
            ProductCategory::Beauty => &["beauty", "cosmetics", "makeup"],
            ProductCategory::Fragrances => &["fragrance", "perfume", "scent"],
            ProductCategory::Furniture => &["furniture", "home", "decor"],
            ProductCategory::HomeDecoration => &["decoration", "home", "accessories"],
            ProductCategory::KitchenAccessories => &["kitchen", "cooking", "utensils"],
            ProductCategory::Laptops => &["electronics", "computer", "laptop"],
            ProductCategory::MensShirts => &["clothing", "mens", "shirts"],
            ProductCategory::MensShoes => &["footwear", "mens", "shoes"],
            ProductCategory::Smartphones => &["electronics", "phone", "mobile"],
            ProductCategory::WomensDresses => &["clothing", "womens", "dresses"],
        }
    }

    pub fn all() -> Vec<ProductCategory> {
        ProductCategory::iter().collect()
    }
}

/// Tags mixed in when a product needs more tags than its base set.
pub const BONUS_TAGS: &[&str] = &["popular", "new", "featured", "bestseller"];

/// Base set for slugs without an entry in [`ProductCategory`].
pub const FALLBACK_TAGS: &[&str] = &["product", "general"];

/// Every category slug the remote service exposes. Request bodies pick from
/// this wider list; SKU generation only accepts [`ProductCategory`].
pub const SERVICE_CATEGORIES: &[&str] = &[
    "beauty",
    "fragrances",
    "furniture",
    "groceries",
    "home-decoration",
    "kitchen-accessories",
    "laptops",
    "mens-shirts",
    "mens-shoes",
    "mens-watches",
    "mobile-accessories",
    "motorcycle",
    "skin-care",
    "smartphones",
    "sports-accessories",
    "sunglasses",
    "tablets",
    "tops",
    "vehicle",
    "womens-bags",
    "womens-dresses",
    "womens-jewellery",
    "womens-shoes",
    "womens-watches",
];

pub const PRODUCT_BRANDS: &[&str] = &[
    "Essence",
    "Glamour Beauty",
    "Velvet Touch",
    "Chic Cosmetics",
    "Nail Couture",
    "Apple",
    "Samsung",
    "Sony",
];

pub const REQUEST_BRANDS: &[&str] = &[
    "Essence",
    "Glamour Beauty",
    "Velvet Touch",
    "Chic Cosmetics",
    "Nail Couture",
    "Calvin Klein",
    "Chanel",
    "Dior",
    "Dolce & Gabbana",
];

pub const DESCRIPTIONS: &[&str] = &[
    "High quality product with excellent features",
    "Premium product designed for everyday use",
    "Innovative solution for modern lifestyle",
    "Best-in-class product with superior performance",
    "Affordable option with great value",
    "Professional grade product for demanding users",
];

pub const WARRANTIES: &[&str] = &[
    "1 week warranty",
    "30 days warranty",
    "6 months warranty",
    "1 year warranty",
    "2 years warranty",
    "No warranty",
    "Lifetime warranty",
];

pub const SHIPPING_OPTIONS: &[&str] = &[
    "Ships in 1-2 business days",
    "Ships in 3-5 business days",
    "Ships in 5-7 business days",
    "Ships in 1 week",
    "Same day delivery available",
    "Free shipping on orders over $50",
];

pub const RETURN_POLICIES: &[&str] = &[
    "No return policy",
    "30 days return policy",
    "60 days return policy",
    "90 days return policy",
    "Returns accepted within 14 days",
    "Exchange only, no returns",
    "Full refund if not satisfied",
];

pub const IN_STOCK: &str = "In Stock";

pub const AVAILABILITY_STATUSES: &[&str] = &[
    IN_STOCK,
    "Low Stock",
    "Out of Stock",
    "Pre-order",
    "Discontinued",
];

/// Probability that a generated product is plainly "In Stock".
pub const IN_STOCK_BIAS: f64 = 0.8;

pub const MINIMUM_ORDER_QUANTITIES: &[u32] = &[1, 5, 10, 12, 24, 48, 50, 100];

pub const REVIEW_COMMENTS: &[&str] = &[
    "Excellent product!",
    "Very satisfied!",
    "Good value for money",
    "Would recommend!",
    "Not what I expected",
    "Could be better",
    "Amazing quality!",
    "Fast shipping",
    "Highly impressed!",
    "Would not recommend!",
    "Perfect for my needs",
    "Great customer service",
];

pub const FIRST_NAMES: &[&str] = &[
    "John", "Jane", "Mike", "Sarah", "David", "Emma", "Chris", "Lisa", "Tom", "Anna", "Lucas",
    "Eleanor",
];

pub const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Brown", "Davis", "Wilson", "Garcia", "Miller", "Taylor", "Anderson",
    "Collins", "Gordon", "Martinez",
];

pub const REVIEWER_EMAIL_DOMAIN: &str = "x.dummyjson.com";

pub const QR_CODE_URL: &str = "https://cdn.dummyjson.com/public/qr-code.png";

pub const PRODUCT_IMAGE_BASE: &str = "https://cdn.dummyjson.com/product-images";

pub const REQUEST_IMAGE_BASE: &str = "https://i.imgur.com";
