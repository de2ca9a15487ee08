mod support;

use assert_matches::assert_matches;
use product_api_harness::api::NEGATIVE_CREATE_STATUSES;
use product_api_harness::generators::payload::{
    CreateOptions, InvalidVariant, generate_for_create, generate_invalid_with,
    random_product_for_patch,
};
use product_api_harness::model::ProductPayload;
use product_api_harness::{CreateScenario, HarnessError};
use strum::IntoEnumIterator;
use support::{FakeOptions, FakeService, assertion_check, init_test_logging, seeded};

fn strict_service_options() -> FakeOptions {
    FakeOptions {
        reject_invalid: true,
        ..FakeOptions::default()
    }
}

#[tokio::test]
async fn every_valid_dataset_body_is_created() {
    init_test_logging();
    let service = FakeService::start().await;
    let api = service.api();
    let mut rng = seeded(101);

    let datasets = api.catalog().post_datasets(&mut rng).expect("datasets");
    for payload in datasets.valid.iter().chain(&datasets.edge_case) {
        let response = api
            .create_product_with_validation(payload)
            .await
            .unwrap_or_else(|err| panic!("create {:?}: {err}", payload.title));
        assert_eq!(response.status, 201);
        assert_eq!(
            response.body["id"].as_u64(),
            Some(service.product_count() + 1)
        );
        assert_eq!(response.body["title"].as_str(), payload.title.as_deref());
    }
}

#[tokio::test]
async fn every_create_scenario_lands_on_a_tolerated_status() {
    init_test_logging();
    for options in [FakeOptions::default(), strict_service_options()] {
        let service = FakeService::start_with(options).await;
        let api = service.api();
        let mut rng = seeded(102);

        for scenario in CreateScenario::iter() {
            for _ in 0..3 {
                let (_, response) = api
                    .create_random_with_validation(&mut rng, scenario)
                    .await
                    .unwrap_or_else(|err| panic!("{scenario}: {err}"));
                if scenario == CreateScenario::Valid {
                    assert_eq!(response.status, 201);
                } else {
                    assert!(NEGATIVE_CREATE_STATUSES.contains(&response.status));
                }
            }
        }
    }
}

#[tokio::test]
async fn strict_service_rejects_each_invalid_variant() {
    init_test_logging();
    let service = FakeService::start_with(strict_service_options()).await;
    let api = service.api();
    let mut rng = seeded(103);

    for variant in InvalidVariant::all() {
        let invalid = generate_invalid_with(&mut rng, variant);
        let response = api.create_product(&invalid.payload).await.expect("round trip");
        assert_eq!(response.status, 400, "{variant:?} should be rejected");
        assert!(response.body["message"].is_string());

        let err = api
            .create_product_with_validation(&invalid.payload)
            .await
            .expect_err("strict create check");
        assert_eq!(assertion_check(&err), "status_code");
    }
}

#[tokio::test]
async fn put_with_valid_and_edge_case_data_is_echoed() {
    init_test_logging();
    let service = FakeService::start().await;
    let api = service.api();
    let mut rng = seeded(104);

    for _ in 0..3 {
        api.update_with_random_valid_data(&mut rng, None)
            .await
            .expect("valid update");
        api.update_with_random_edge_case_data(&mut rng, Some(1))
            .await
            .expect("edge-case update");
    }
}

#[tokio::test]
async fn put_keeps_the_target_id() {
    init_test_logging();
    let service = FakeService::start().await;
    let api = service.api();
    let mut rng = seeded(105);

    let mut payload = generate_for_create(&mut rng, &CreateOptions::new()).expect("body");
    payload
        .extra
        .insert("id".to_string(), serde_json::json!(999));
    let response = api
        .update_product_with_validation(3, &payload, true)
        .await
        .expect("update ignores a body id");
    assert_eq!(response.body["id"].as_u64(), Some(3));
}

#[tokio::test]
async fn invalid_updates_are_tolerated_either_way() {
    init_test_logging();
    for options in [FakeOptions::default(), strict_service_options()] {
        let service = FakeService::start_with(options).await;
        let api = service.api();
        let mut rng = seeded(106);

        for _ in 0..5 {
            api.update_with_random_invalid_data(&mut rng, None)
                .await
                .expect("tolerated update");
            api.patch_with_random_invalid_data(&mut rng, None)
                .await
                .expect("tolerated patch");
        }
    }
}

#[tokio::test]
async fn strict_update_rejection_fails_the_success_path() {
    init_test_logging();
    let service = FakeService::start_with(strict_service_options()).await;
    let api = service.api();

    let payload = ProductPayload {
        price: Some(-10.0),
        ..Default::default()
    };
    let err = api
        .update_product_with_validation(2, &payload, true)
        .await
        .expect_err("negative price rejected");
    assert_matches!(err, HarnessError::AssertionFailure(ref failure) if failure.actual == "400");

    api.update_product_with_validation(2, &payload, false)
        .await
        .expect("tolerated when failure is expected");
}

#[tokio::test]
async fn patch_echoes_only_the_sent_fields() {
    init_test_logging();
    let service = FakeService::start().await;
    let api = service.api();
    let mut rng = seeded(107);

    for _ in 0..5 {
        api.patch_with_random_valid_data(&mut rng, None)
            .await
            .expect("valid patch");
    }

    let payload = random_product_for_patch(&mut rng).expect("patch body");
    let before = api.get_product_by_id(4).await.expect("original");
    let response = api
        .patch_product_with_validation(4, &payload, true)
        .await
        .expect("patch");
    assert_eq!(response.body["sku"], before.body["sku"]);
    assert_eq!(response.body["title"].as_str(), payload.title.as_deref());
}

#[tokio::test]
async fn write_to_a_missing_product_is_not_found() {
    init_test_logging();
    let service = FakeService::start().await;
    let api = service.api();
    let missing = api.catalog().first_missing_id();

    let payload = ProductPayload {
        title: Some("Ghost".to_string()),
        ..Default::default()
    };
    let response = api.update_product(missing, &payload).await.expect("round trip");
    assert_eq!(response.status, 404);

    let err = api
        .patch_product_with_validation(missing, &payload, true)
        .await
        .expect_err("nothing to patch");
    assert_eq!(assertion_check(&err), "status_code");
}

#[tokio::test]
async fn delete_returns_a_receipt() {
    init_test_logging();
    let service = FakeService::start().await;
    let api = service.api();
    let mut rng = seeded(108);

    let id = api.catalog().valid_product_id(&mut rng);
    let receipt = api
        .delete_product_with_validation(id)
        .await
        .expect("delete");
    assert_eq!(receipt.id, id);
    assert!(receipt.is_deleted);
    assert!(receipt.rest.contains_key("title"));

    // Deletes are simulated; the product is still there.
    api.get_product_by_id_with_validation(id)
        .await
        .expect("still readable");
}

#[tokio::test]
async fn delete_of_a_missing_product_is_not_found() {
    init_test_logging();
    let service = FakeService::start().await;
    let api = service.api();

    let response = api
        .delete_with_random_invalid_id()
        .await
        .expect("not found path");
    assert_eq!(response.status, 404);

    let err = api
        .delete_product_with_validation(api.catalog().first_missing_id())
        .await
        .expect_err("receipt expected");
    assert_eq!(assertion_check(&err), "status_code");
}
