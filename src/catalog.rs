//! Fixed and derived test datasets.
//!
//! Fixed collections are plain slices and never change. Derived collections
//! (`post_datasets`, `regression_data`) are rebuilt on every call by
//! delegating to the generators, so no two test cases share a value.
//!
//! `max_known_id` couples the catalog to the remote service: it must equal the
//! number of records the service currently exposes. It is injected from
//! [`HarnessConfig`](crate::config::HarnessConfig), never computed here.

use crate::error::HarnessResult;
use crate::generators::payload::{CreateOptions, MAX_TITLE_LEN, generate_for_create, generate_invalid};
use crate::generators::primitives::pick;
use crate::generators::tables::SERVICE_CATEGORIES;
use crate::model::{PaginationParams, ProductPayload, SortOption, SortOrder};
use rand::Rng;
use serde::Serialize;
use serde_json::{Value, json};

/// Record count of the public dataset at the time of writing.
pub const DEFAULT_MAX_KNOWN_ID: u64 = 194;

/// Page size the remote uses when no `limit` is sent.
pub const DEFAULT_PAGE_SIZE: u64 = 30;

/// Positive id far outside the dataset.
pub const OUT_OF_RANGE_ID: i64 = 99_999;

pub const INVALID_PRODUCT_IDS: &[i64] = &[OUT_OF_RANGE_ID, -1, 0];

pub const INVALID_CATEGORIES: &[&str] = &["nonexistent", "fake-category", ""];

pub const VALID_SEARCH_TERMS: &[&str] = &["phone"];

pub const INVALID_SEARCH_TERMS: &[&str] = &["xyzabc123", ""];

pub const PAGINATION_CASES: &[PaginationParams] = &[
    PaginationParams::new(10, 0),
    PaginationParams::new(5, 10),
    PaginationParams::new(1, 0),
    PaginationParams::new(DEFAULT_PAGE_SIZE, 0),
    PaginationParams::new(50, 20),
];

pub const SELECT_FIELD_SETS: &[&[&str]] = &[
    &["id", "title", "price"],
    &["title", "description", "category"],
    &["id", "price", "discountPercentage", "rating"],
    &["title", "brand", "category", "stock"],
];

pub const SORT_OPTIONS: &[SortOption] = &[
    SortOption { sort_by: "title", order: SortOrder::Asc },
    SortOption { sort_by: "title", order: SortOrder::Desc },
    SortOption { sort_by: "price", order: SortOrder::Asc },
    SortOption { sort_by: "price", order: SortOrder::Desc },
    SortOption { sort_by: "rating", order: SortOrder::Desc },
    SortOption { sort_by: "rating", order: SortOrder::Asc },
];

/// Entry point for every dataset the scenarios draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestDataCatalog {
    max_known_id: u64,
}

impl TestDataCatalog {
    pub fn new(max_known_id: u64) -> Self {
        Self { max_known_id }
    }

    pub fn max_known_id(&self) -> u64 {
        self.max_known_id
    }

    /// Zero limit, a limit covering the whole dataset, and a skip just short
    /// of its end.
    pub fn edge_case_pagination(&self) -> Vec<PaginationParams> {
        vec![
            PaginationParams::new(0, 0),
            PaginationParams::new(self.max_known_id, 0),
            PaginationParams::new(10, self.max_known_id.saturating_sub(1)),
        ]
    }

    /// First id guaranteed not to exist.
    pub fn first_missing_id(&self) -> u64 {
        self.max_known_id + 1
    }

    pub fn valid_product_id<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        rng.gen_range(1..=self.max_known_id.max(1))
    }

    pub fn invalid_product_id<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        pick(rng, INVALID_PRODUCT_IDS).copied().unwrap_or(OUT_OF_RANGE_ID)
    }

    pub fn valid_category<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        pick(rng, SERVICE_CATEGORIES).copied().unwrap_or("smartphones")
    }

    pub fn invalid_category<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        pick(rng, INVALID_CATEGORIES).copied().unwrap_or("nonexistent")
    }

    pub fn valid_search_term<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        pick(rng, VALID_SEARCH_TERMS).copied().unwrap_or("phone")
    }

    pub fn invalid_search_term<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        pick(rng, INVALID_SEARCH_TERMS).copied().unwrap_or("xyzabc123")
    }

    pub fn random_pagination<R: Rng + ?Sized>(&self, rng: &mut R) -> PaginationParams {
        pick(rng, PAGINATION_CASES)
            .copied()
            .unwrap_or(PaginationParams::new(DEFAULT_PAGE_SIZE, 0))
    }

    pub fn random_edge_pagination<R: Rng + ?Sized>(&self, rng: &mut R) -> PaginationParams {
        let cases = self.edge_case_pagination();
        cases[rng.gen_range(0..cases.len())]
    }

    pub fn random_select_fields<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static [&'static str] {
        pick(rng, SELECT_FIELD_SETS).copied().unwrap_or(&["id", "title", "price"])
    }

    /// Create/update bodies grouped by expected outcome.
    pub fn post_datasets<R: Rng + ?Sized>(&self, rng: &mut R) -> HarnessResult<PostDatasets> {
        let valid = vec![
            generate_for_create(rng, &CreateOptions::new().category("smartphones"))?,
            generate_for_create(rng, &CreateOptions::new().category("laptops"))?,
            generate_for_create(rng, &CreateOptions::new().category("fragrances"))?,
            generate_for_create(rng, &CreateOptions::new().price_range(100.0, 500.0))?,
            generate_for_create(rng, &CreateOptions::new().title_length(50))?,
        ];

        let mut invalid: Vec<ProductPayload> =
            (0..3).map(|_| generate_invalid(rng).payload).collect();
        invalid.push(ProductPayload {
            title: Some(String::new()),
            price: Some(-1.0),
            stock: Some(-1),
            ..Default::default()
        });
        invalid.push(payload_from(json!({ "invalidField": "should not exist" })));

        let edits: [fn(&mut ProductPayload); 7] = [
            |p: &mut ProductPayload| p.price = Some(0.01),
            |p: &mut ProductPayload| p.price = Some(99_999.99),
            |p: &mut ProductPayload| p.stock = Some(0),
            |p: &mut ProductPayload| p.discount_percentage = Some(0.0),
            |p: &mut ProductPayload| p.discount_percentage = Some(99.99),
            |p: &mut ProductPayload| p.title = Some("A".to_string()),
            |p: &mut ProductPayload| p.title = Some("A".repeat(MAX_TITLE_LEN)),
        ];
        let mut edge_case = Vec::with_capacity(edits.len());
        for edit in edits {
            let mut body = generate_for_create(rng, &CreateOptions::new())?;
            edit(&mut body);
            edge_case.push(body);
        }

        Ok(PostDatasets {
            valid,
            invalid,
            edge_case,
        })
    }

    /// Minimal data set for a quick health pass over the read endpoints.
    pub fn smoke_data(&self) -> SmokeData {
        SmokeData {
            product_id: 1,
            category: "smartphones",
            search_term: "phone",
            pagination: PaginationParams::new(10, 0),
            select_fields: &["id", "title", "price"],
        }
    }

    pub fn regression_data<R: Rng + ?Sized>(&self, rng: &mut R) -> RegressionData {
        RegressionData {
            valid_product_id: self.valid_product_id(rng),
            invalid_product_ids: INVALID_PRODUCT_IDS.to_vec(),
            valid_category: self.valid_category(rng),
            invalid_categories: INVALID_CATEGORIES.to_vec(),
            pagination: PAGINATION_CASES.to_vec(),
            edge_case_pagination: self.edge_case_pagination(),
            search_terms: VALID_SEARCH_TERMS.to_vec(),
            invalid_search_terms: INVALID_SEARCH_TERMS.to_vec(),
        }
    }
}

impl Default for TestDataCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_KNOWN_ID)
    }
}

fn payload_from(value: Value) -> ProductPayload {
    serde_json::from_value(value).unwrap_or_default()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDatasets {
    pub valid: Vec<ProductPayload>,
    pub invalid: Vec<ProductPayload>,
    pub edge_case: Vec<ProductPayload>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmokeData {
    pub product_id: u64,
    pub category: &'static str,
    pub search_term: &'static str,
    pub pagination: PaginationParams,
    pub select_fields: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegressionData {
    pub valid_product_id: u64,
    pub invalid_product_ids: Vec<i64>,
    pub valid_category: &'static str,
    pub invalid_categories: Vec<&'static str>,
    pub pagination: Vec<PaginationParams>,
    pub edge_case_pagination: Vec<PaginationParams>,
    pub search_terms: Vec<&'static str>,
    pub invalid_search_terms: Vec<&'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::payload::PriceRange;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn fixed_collections_match_documented_cases() {
        assert!(INVALID_PRODUCT_IDS.contains(&-1));
        assert!(INVALID_PRODUCT_IDS.contains(&0));
        assert!(INVALID_PRODUCT_IDS.iter().any(|id| *id > DEFAULT_MAX_KNOWN_ID as i64));
        assert!(INVALID_CATEGORIES.contains(&""));
        assert!(PAGINATION_CASES.contains(&PaginationParams::new(DEFAULT_PAGE_SIZE, 0)));
    }

    #[test]
    fn edge_cases_follow_max_known_id() {
        let catalog = TestDataCatalog::new(50);
        assert_eq!(
            catalog.edge_case_pagination(),
            vec![
                PaginationParams::new(0, 0),
                PaginationParams::new(50, 0),
                PaginationParams::new(10, 49),
            ]
        );
        assert_eq!(catalog.first_missing_id(), 51);

        let mut rng = StdRng::seed_from_u64(31);
        for _ in 0..200 {
            let id = catalog.valid_product_id(&mut rng);
            assert!((1..=50).contains(&id));
        }
    }

    #[test]
    fn post_datasets_are_rebuilt_per_call() {
        let catalog = TestDataCatalog::default();
        let mut rng = StdRng::seed_from_u64(32);
        let first = catalog.post_datasets(&mut rng).expect("datasets");
        let second = catalog.post_datasets(&mut rng).expect("datasets");

        assert_eq!(first.valid.len(), 5);
        assert_eq!(first.invalid.len(), 5);
        assert_eq!(first.edge_case.len(), 7);
        assert_ne!(first.valid[0].title, second.valid[0].title);

        let ranged = first.valid[3].price.expect("price");
        assert!(PriceRange::new(100.0, 500.0).expect("range").contains(ranged));
        assert_eq!(first.valid[4].title.as_ref().map(String::len), Some(50));
        assert_eq!(
            first.invalid[4].extra.get("invalidField"),
            Some(&json!("should not exist"))
        );
        assert_eq!(first.edge_case[6].title.as_ref().map(String::len), Some(255));
    }

    #[test]
    fn regression_data_reuses_fixed_collections() {
        let catalog = TestDataCatalog::default();
        let mut rng = StdRng::seed_from_u64(33);
        let data = catalog.regression_data(&mut rng);
        assert_eq!(data.invalid_product_ids, INVALID_PRODUCT_IDS.to_vec());
        assert!(SERVICE_CATEGORIES.contains(&data.valid_category));
        assert_eq!(data.edge_case_pagination.len(), 3);
        assert_eq!(catalog.smoke_data().select_fields, &["id", "title", "price"]);
    }
}
