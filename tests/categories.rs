mod support;

use product_api_harness::catalog::INVALID_CATEGORIES;
use product_api_harness::generators::tables::SERVICE_CATEGORIES;
use product_api_harness::model::Category;
use support::{FakeService, assertion_check, init_test_logging, seeded};

#[tokio::test]
async fn categories_carry_slug_name_and_url() {
    init_test_logging();
    let service = FakeService::start().await;
    let api = service.api();

    let response = api.get_categories_with_validation().await.expect("categories");
    let categories: Vec<Category> = response.json().expect("typed categories");
    assert_eq!(categories.len(), SERVICE_CATEGORIES.len());

    let laptops = categories
        .iter()
        .find(|c| c.slug == "laptops")
        .expect("laptops listed");
    assert_eq!(laptops.name, "Laptops");
    assert_eq!(
        laptops.url,
        format!("{}/products/category/laptops", service.base_url())
    );
}

#[tokio::test]
async fn category_list_is_slugs_only() {
    init_test_logging();
    let service = FakeService::start().await;
    let api = service.api();

    let response = api
        .get_category_list_with_validation()
        .await
        .expect("category list");
    let slugs: Vec<String> = response.json().expect("string array");
    assert!(slugs.iter().any(|s| s == "home-decoration"));
    assert!(slugs.iter().all(|s| SERVICE_CATEGORIES.contains(&s.as_str())));
}

#[tokio::test]
async fn random_valid_categories_only_hold_their_members() {
    init_test_logging();
    let service = FakeService::start().await;
    let api = service.api();
    let mut rng = seeded(11);

    for _ in 0..5 {
        let slug = api.catalog().valid_category(&mut rng);
        let response = api
            .get_products_by_category_with_validation(slug)
            .await
            .unwrap_or_else(|err| panic!("category {slug}: {err}"));
        assert!(response.body["total"].as_u64().unwrap_or(0) > 0);
    }
}

#[tokio::test]
async fn unknown_categories_answer_with_an_empty_envelope() {
    init_test_logging();
    let service = FakeService::start().await;
    let api = service.api();

    for slug in INVALID_CATEGORIES {
        let response = api
            .get_nonexistent_category_with_validation(slug)
            .await
            .unwrap_or_else(|err| panic!("category {slug:?}: {err}"));
        assert_eq!(response.status, 200);
        assert_eq!(response.body["products"].as_array().map(Vec::len), Some(0));
    }
}

#[tokio::test]
async fn unknown_category_fails_the_membership_check() {
    init_test_logging();
    let service = FakeService::start().await;
    let api = service.api();

    let err = api
        .get_products_by_category_with_validation("nonexistent")
        .await
        .expect_err("empty envelope is not a populated category");
    assert_eq!(assertion_check(&err), "pagination_structure");
}

#[tokio::test]
async fn populated_category_fails_the_empty_expectation() {
    init_test_logging();
    let service = FakeService::start().await;
    let api = service.api();

    let err = api
        .get_nonexistent_category_with_validation("smartphones")
        .await
        .expect_err("smartphones is populated");
    assert_eq!(assertion_check(&err), "empty_category");
}
