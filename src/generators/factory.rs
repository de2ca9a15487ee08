//! `make` / `make_many` over any generator.

use super::product::{generate_product, generate_product_in};
use super::tables::ProductCategory;
use crate::model::Product;
use rand::Rng;
use serde::Serialize;

/// A generator with override hooks.
///
/// `build` produces a fresh value; `make` lets the caller adjust it before it
/// is handed out, so fixtures read as "a product, except ...".
pub trait Factory {
    type Output;

    fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Output;

    fn make<R, F>(&self, rng: &mut R, overrides: F) -> Self::Output
    where
        R: Rng + ?Sized,
        F: FnOnce(&mut Self::Output),
    {
        let mut value = self.build(rng);
        overrides(&mut value);
        value
    }

    fn make_many<R, F>(&self, rng: &mut R, count: usize, overrides: F) -> Vec<Self::Output>
    where
        R: Rng + ?Sized,
        F: Fn(&mut Self::Output),
    {
        (0..count).map(|_| self.make(rng, &overrides)).collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProductFactory {
    category: Option<ProductCategory>,
}

impl ProductFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin every built product to `category`.
    pub fn in_category(category: ProductCategory) -> Self {
        Self {
            category: Some(category),
        }
    }

    pub fn smoke_bundle<R: Rng + ?Sized>(&self, rng: &mut R) -> SmokeProducts {
        SmokeProducts {
            valid: ProductFactory::in_category(ProductCategory::Smartphones).build(rng),
            popular: self.make(rng, |p| {
                p.rating = 4.5;
                p.stock = 100;
            }),
            out_of_stock: self.make(rng, |p| {
                p.stock = 0;
                p.availability_status = "Out of Stock".to_string();
            }),
        }
    }

    pub fn regression_bundle<R: Rng + ?Sized>(&self, rng: &mut R) -> RegressionProducts {
        RegressionProducts {
            smoke: self.smoke_bundle(rng),
            edge_cases: vec![
                self.make(rng, |p| p.price = 0.01),
                self.make(rng, |p| p.price = 99_999.99),
                self.make(rng, |p| p.title = "A".repeat(255)),
            ],
        }
    }
}

impl Factory for ProductFactory {
    type Output = Product;

    fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Product {
        match self.category {
            Some(category) => generate_product_in(rng, category),
            None => generate_product(rng),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmokeProducts {
    pub valid: Product,
    pub popular: Product,
    pub out_of_stock: Product,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegressionProducts {
    #[serde(flatten)]
    pub smoke: SmokeProducts,
    pub edge_cases: Vec<Product>,
}
