//! Integration tests for the catalog endpoints: listings and the
//! duplicate-gated insertion the bot forwards to.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json};
use serde_json::json;

fn located_payload() -> serde_json::Value {
    json!({
        "category": "A",
        "brand": "B",
        "name": "C",
        "flavor": "D",
        "image_url": "/images/photo.jpg",
        "price": 150,
        "description": "d",
        "city": "X",
        "street": "Lenina 1",
    })
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_collections_list_as_empty_arrays() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    for uri in ["/api/products", "/api/akcii", "/api/novinki"] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }
}

#[tokio::test]
async fn corrupt_collection_file_lists_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    std::fs::create_dir_all(&data_dir).unwrap();
    std::fs::write(data_dir.join("products.json"), b"{definitely not json").unwrap();

    let app = common::build_test_app(dir.path());
    let response = get(app, "/api/products").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

// ---------------------------------------------------------------------------
// Insertion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_product_assigns_numeric_string_id() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    let response = post_json(app.clone(), "/api/add-product", located_payload()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    let id = json["id"].as_str().unwrap();
    assert!(id.parse::<u32>().is_ok(), "id should be a numeric string");

    // The record shows up in the listing with the same id.
    let listing = body_json(get(app, "/api/products").await).await;
    assert_eq!(listing[0]["id"], json["id"]);
    assert_eq!(listing[0]["street"], "Lenina 1");
}

#[tokio::test]
async fn missing_field_names_the_first_gap() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    let mut payload = located_payload();
    payload.as_object_mut().unwrap().remove("image_url");

    let response = post_json(app, "/api/add-product", payload).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Missing required field: image_url");
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn empty_city_or_street_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    let mut payload = located_payload();
    payload["city"] = json!("");

    let response = post_json(app, "/api/add-product", payload).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Missing city or street");
}

// ---------------------------------------------------------------------------
// Duplicate detection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resubmission_with_restyled_street_conflicts() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    let first = post_json(app.clone(), "/api/add-product", located_payload()).await;
    assert_eq!(first.status(), StatusCode::OK);

    let mut restyled = located_payload();
    restyled["street"] = json!("lenina, 1!");
    let second = post_json(app.clone(), "/api/add-product", restyled).await;

    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(second).await["code"], "CONFLICT");

    // The conflicting record was not stored.
    let listing = body_json(get(app, "/api/products").await).await;
    assert_eq!(listing.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn different_flavor_is_not_a_conflict() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    post_json(app.clone(), "/api/add-product", located_payload()).await;

    let mut other = located_payload();
    other["flavor"] = json!("E");
    let response = post_json(app.clone(), "/api/add-product", other).await;

    assert_eq!(response.status(), StatusCode::OK);
    let listing = body_json(get(app, "/api/products").await).await;
    assert_eq!(listing.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unlocated_payloads_are_never_deduplicated() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app(dir.path());

    let mut unlocated = located_payload();
    unlocated.as_object_mut().unwrap().remove("city");
    unlocated.as_object_mut().unwrap().remove("street");

    for _ in 0..2 {
        let response = post_json(app.clone(), "/api/add-product", unlocated.clone()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let listing = body_json(get(app, "/api/products").await).await;
    assert_eq!(listing.as_array().unwrap().len(), 2);
}
