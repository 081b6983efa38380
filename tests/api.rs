//! End-to-end tests: real router, in-memory store, one request per call.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use catalog_api::model::ItemDraft;
use catalog_api::{app, AppState, CatalogStore, MemoryStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let router = app(AppState::new(store.clone()));
    (router, store)
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };
    router.clone().oneshot(request).await.expect("response")
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}

async fn seed_merchant(store: &MemoryStore, name: &str) -> i64 {
    store.create_merchant(name).await.expect("merchant").id
}

async fn seed_item(store: &MemoryStore, name: &str, price: f64, merchant_id: i64) -> i64 {
    store
        .create_item(ItemDraft {
            name: name.to_string(),
            description: format!("{name} description"),
            unit_price: price,
            merchant_id,
        })
        .await
        .expect("item")
        .id
}

#[tokio::test]
async fn items_index_returns_every_item() {
    let (router, store) = test_app();
    let merchant_id = seed_merchant(&store, "Handmade").await;
    seed_item(&store, "Lamp", 10.0, merchant_id).await;
    seed_item(&store, "Mug", 5.5, merchant_id).await;

    let response = send(&router, "GET", "/api/v1/items", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let data = body["data"].as_array().expect("array");
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["type"], "item");
    assert_eq!(data[0]["attributes"]["unit_price"], 10.0);
    assert_eq!(data[0]["attributes"]["merchant_id"], merchant_id);
}

#[tokio::test]
async fn item_show_returns_string_id_and_404_for_unknown() {
    let (router, store) = test_app();
    let merchant_id = seed_merchant(&store, "Handmade").await;
    let id = seed_item(&store, "Lamp", 10.0, merchant_id).await;

    let response = send(&router, "GET", &format!("/api/v1/items/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["id"], id.to_string());
    assert_eq!(body["data"]["attributes"]["name"], "Lamp");

    let response = send(&router, "GET", "/api/v1/items/180984789", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["message"], "your query could not be completed");
    assert_eq!(body["errors"][0], "Couldn't find Item with 'id'=180984789");
}

#[tokio::test]
async fn item_create_round_trips_and_returns_201() {
    let (router, store) = test_app();
    let merchant_id = seed_merchant(&store, "Handmade").await;

    let payload = json!({ "item": {
        "name": "value1",
        "description": "value2",
        "unit_price": 125.33,
        "merchant_id": merchant_id
    }});
    let response = send(&router, "POST", "/api/v1/items", Some(payload)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["attributes"]["name"], "value1");
    assert_eq!(body["data"]["attributes"]["unit_price"], 125.33);

    let id: i64 = body["data"]["id"].as_str().expect("id").parse().expect("i64");
    assert!(store.get_item(id).await.expect("get").is_some());
}

#[tokio::test]
async fn item_create_with_bad_payload_lists_every_failure() {
    let (router, store) = test_app();
    seed_merchant(&store, "Handmade").await;

    let response = send(&router, "POST", "/api/v1/items", Some(json!({ "item": {} }))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "your query could not be completed");
    let errors = body["errors"].as_array().expect("errors array");
    assert_eq!(errors.len(), 4);
    assert_eq!(errors[0], "Name can't be blank");
    assert_eq!(errors[2], "Unit price must be greater than 0");

    let payload = json!({ "item": {
        "name": "Lamp",
        "description": "desc",
        "unit_price": -5,
        "merchant_id": 1
    }});
    let response = send(&router, "POST", "/api/v1/items", Some(payload)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errors"][0], "Unit price must be greater than 0");
}

#[tokio::test]
async fn item_update_applies_partial_changes() {
    let (router, store) = test_app();
    let merchant_id = seed_merchant(&store, "Handmade").await;
    let id = seed_item(&store, "Lamp", 10.0, merchant_id).await;

    let payload = json!({ "item": { "name": "Sconce" } });
    let response = send(&router, "PATCH", &format!("/api/v1/items/{id}"), Some(payload)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["attributes"]["name"], "Sconce");
    assert_eq!(body["data"]["attributes"]["unit_price"], 10.0);

    let payload = json!({ "item": { "name": "x" } });
    let response = send(&router, "PATCH", "/api/v1/items/999", Some(payload)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["errors"][0], "Couldn't find Item with 'id'=999");
}

#[tokio::test]
async fn item_delete_cascades_single_item_invoices() {
    let (router, store) = test_app();
    let merchant_id = seed_merchant(&store, "Handmade").await;
    let doomed_item = seed_item(&store, "Lamp", 10.0, merchant_id).await;
    let kept_item = seed_item(&store, "Mug", 5.0, merchant_id).await;

    let sole = store.create_invoice(1, merchant_id).await.expect("invoice");
    store.add_invoice_item(sole.id, doomed_item).await.expect("row");
    let shared = store.create_invoice(1, merchant_id).await.expect("invoice");
    store.add_invoice_item(shared.id, doomed_item).await.expect("row");
    store.add_invoice_item(shared.id, kept_item).await.expect("row");

    let response = send(&router, "DELETE", &format!("/api/v1/items/{doomed_item}"), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    assert!(bytes.is_empty());

    assert!(store.get_item(doomed_item).await.expect("get").is_none());
    assert!(store.get_invoice(sole.id).await.expect("get").is_none());
    assert!(store.get_invoice(shared.id).await.expect("get").is_some());
    let rows = store
        .invoice_items_for_invoice(shared.id)
        .await
        .expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].item_id, kept_item);

    let response = send(&router, "DELETE", &format!("/api/v1/items/{doomed_item}"), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn find_all_by_name_matches_case_insensitively_in_alphabetical_order() {
    let (router, store) = test_app();
    let merchant_id = seed_merchant(&store, "Handmade").await;
    seed_item(&store, "Cool lAMp", 10.0, merchant_id).await;
    seed_item(&store, "Namaste shirt", 20.0, merchant_id).await;
    seed_item(&store, "fondue set", 30.0, merchant_id).await;

    let response = send(&router, "GET", "/api/v1/items/find_all?name=am", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let data = body["data"].as_array().expect("array");
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["attributes"]["name"], "Cool lAMp");
    assert_eq!(data[1]["attributes"]["name"], "Namaste shirt");
}

#[tokio::test]
async fn find_all_by_price_bounds_sorts_ascending() {
    let (router, store) = test_app();
    let merchant_id = seed_merchant(&store, "Handmade").await;
    seed_item(&store, "A", 32.45, merchant_id).await;
    seed_item(&store, "B", 14.75, merchant_id).await;
    seed_item(&store, "C", 4.44, merchant_id).await;

    let response = send(&router, "GET", "/api/v1/items/find_all?min_price=13.24", None).await;
    let body = body_json(response).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .expect("array")
        .iter()
        .map(|r| r["attributes"]["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, ["B", "A"]);

    let response = send(&router, "GET", "/api/v1/items/find_all?max_price=15.24", None).await;
    let body = body_json(response).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .expect("array")
        .iter()
        .map(|r| r["attributes"]["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, ["C", "B"]);

    let response = send(
        &router,
        "GET",
        "/api/v1/items/find_all?min_price=13.24&max_price=34",
        None,
    )
    .await;
    let body = body_json(response).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .expect("array")
        .iter()
        .map(|r| r["attributes"]["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, ["B", "A"]);
}

#[tokio::test]
async fn find_all_with_no_match_returns_an_empty_array() {
    let (router, store) = test_app();
    let merchant_id = seed_merchant(&store, "Handmade").await;
    seed_item(&store, "Lamp", 10.0, merchant_id).await;

    let response = send(&router, "GET", "/api/v1/items/find_all?name=NOMATCH", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn find_all_rejects_bad_parameter_combinations() {
    let (router, _store) = test_app();

    for uri in ["/api/v1/items/find_all", "/api/v1/items/find_all?name="] {
        let response = send(&router, "GET", uri, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body = body_json(response).await;
        assert_eq!(body["message"], "your query could not be completed");
        assert_eq!(body["errors"][0], "parameter cannot be missing", "{uri}");
    }

    for uri in [
        "/api/v1/items/find_all?min_price=",
        "/api/v1/items/find_all?min_price=-5",
        "/api/v1/items/find_all?max_price=-1.2",
        "/api/v1/items/find_all?min_price=ring",
        "/api/v1/items/find_all?name=ring&min_price=50",
        "/api/v1/items/find_all?name=ring&max_price=50",
    ] {
        let response = send(&router, "GET", uri, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body = body_json(response).await;
        assert_eq!(body["errors"][0], "parameter is incorrect", "{uri}");
    }
}

#[tokio::test]
async fn merchant_find_returns_first_match_or_sentinel() {
    let (router, store) = test_app();
    seed_merchant(&store, "Turing").await;
    seed_merchant(&store, "Ring World").await;

    let response = send(&router, "GET", "/api/v1/merchants/find?name=ring", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["attributes"]["name"], "Ring World");
    assert_eq!(body["data"]["type"], "merchant");

    let response = send(&router, "GET", "/api/v1/merchants/find?name=NOMATCH", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"], json!({}));

    for uri in ["/api/v1/merchants/find", "/api/v1/merchants/find?name="] {
        let response = send(&router, "GET", uri, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body = body_json(response).await;
        assert_eq!(body["errors"][0], "parameter cannot be missing");
    }
}

#[tokio::test]
async fn merchant_show_and_relationship_lookups() {
    let (router, store) = test_app();
    let merchant_id = seed_merchant(&store, "Handmade").await;
    let other_id = seed_merchant(&store, "Elsewhere").await;
    let item_id = seed_item(&store, "Lamp", 10.0, merchant_id).await;
    seed_item(&store, "Mug", 5.0, merchant_id).await;
    seed_item(&store, "Rug", 50.0, other_id).await;

    let response = send(&router, "GET", &format!("/api/v1/merchants/{merchant_id}"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["attributes"]["name"], "Handmade");

    let response = send(
        &router,
        "GET",
        &format!("/api/v1/merchants/{merchant_id}/items"),
        None,
    )
    .await;
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().expect("array").len(), 2);

    let response = send(&router, "GET", "/api/v1/merchants/999/items", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["errors"][0], "Couldn't find Merchant with 'id'=999");

    let response = send(
        &router,
        "GET",
        &format!("/api/v1/items/{item_id}/merchant"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["id"], merchant_id.to_string());
}

#[tokio::test]
async fn health_and_version_respond() {
    let (router, _store) = test_app();

    let response = send(&router, "GET", "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");

    let response = send(&router, "GET", "/version", None).await;
    let body = body_json(response).await;
    assert_eq!(body["name"], "catalog-api");
}
