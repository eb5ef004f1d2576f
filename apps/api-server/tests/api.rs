//! End-to-end tests of the HTTP API against a seeded in-memory database.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use luna_api::{router, AppState};
use luna_db::seed::seed_sample_data;
use luna_db::{Database, DbConfig};

async fn app() -> (Router, Database) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    seed_sample_data(db.pool()).await.unwrap();
    (router(AppState::new(db.clone())), db)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn order_count(db: &Database) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(db.pool())
        .await
        .unwrap()
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_branches() {
    let (app, _db) = app().await;
    let (status, body) = get(&app, "/api/branches").await;

    assert_eq!(status, StatusCode::OK);
    let branches = body.as_array().unwrap();
    assert_eq!(branches.len(), 3);
    assert_eq!(branches[0]["name"], "Luna dine - Dhanmondi");
    assert_eq!(branches[0]["status"], "open");
    assert_eq!(branches[2]["status"], "closed");
}

#[tokio::test]
async fn test_trailing_slash() {
    let (app, _db) = app().await;
    let (status, body) = get(&app, "/api/branches/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_settings() {
    let (app, _db) = app().await;

    let (status, body) = get(&app, "/api/settings?branch_id=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["branch_id"], 2);
    assert_eq!(body["vat_percentage"], 12);
    assert_eq!(body["currency_symbol"], "৳");

    let (status, body) = get(&app, "/api/settings?branch_id=99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Branch not found");

    let (status, body) = get(&app, "/api/settings").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required parameter: branch_id");

    let (status, _) = get(&app, "/api/settings?branch_id=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_menu() {
    let (app, _db) = app().await;
    let (status, body) = get(&app, "/api/menu?branch_id=1").await;

    assert_eq!(status, StatusCode::OK);
    let categories = body["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 4);
    assert_eq!(categories[0]["name"], "Appetizers");

    let spring_rolls = &categories[0]["items"][1];
    assert_eq!(spring_rolls["name"], "Spring Rolls");
    assert_eq!(spring_rolls["price"], 150.0);
    assert_eq!(spring_rolls["tags"][0], "vegetarian");

    let sauce = &spring_rolls["customizations"][0];
    assert_eq!(sauce["name"], "Sauce");
    assert_eq!(sauce["type"], "single");
    assert_eq!(sauce["options"][1]["name"], "Soy Garlic");
    assert_eq!(sauce["options"][1]["price"], 10.0);

    let (status, body) = get(&app, "/api/menu?branch_id=404").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"], json!([]));
}

#[tokio::test]
async fn test_tables() {
    let (app, _db) = app().await;
    let (status, body) = get(&app, "/api/tables?branch_id=3").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"id": 15, "table_identifier": "B1", "capacity": 4},
            {"id": 16, "table_identifier": "B2", "capacity": 6},
            {"id": 17, "table_identifier": "B3", "capacity": 4},
        ])
    );
}

// =============================================================================
// Orders
// =============================================================================

fn order_body(promo: Option<&str>) -> Value {
    let mut body = json!({
        "branch_id": 1,
        "order_type": "dine-in",
        "table_id": 1,
        "customer_name": "Rahim",
        "items": [
            {"branch_menu_item_id": 1, "quantity": 2, "customizations": [{"group": "Sauce", "option": "Spicy Mayo"}]},
            {"branch_menu_item_id": 2, "quantity": 1}
        ]
    });
    if let Some(code) = promo {
        body["promo_code"] = json!(code);
    }
    body
}

#[tokio::test]
async fn test_place_order_and_check_status() {
    let (app, db) = app().await;

    let (status, body) = post(&app, "/api/orders", order_body(Some("LUNA10"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "placed");

    let uid = body["order_id"].as_str().unwrap().to_string();
    assert!(uid.starts_with("ORD"));
    assert_eq!(body["estimated_completion_time"].as_str().unwrap().len(), 19);

    let stored = db.orders().find_by_uid(&uid).await.unwrap().unwrap();
    assert_eq!(stored.total_amount.to_string(), "682.50");

    let (status, body) = get(&app, &format!("/api/order_status?order_uid={uid}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order_id"], uid);
    assert_eq!(body["status"], "placed");
}

#[tokio::test]
async fn test_order_status_of_seeded_order() {
    let (app, _db) = app().await;

    let (status, body) = get(&app, "/api/order_status?order_uid=ORD987654321").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "in_kitchen");

    let (status, body) = get(&app, "/api/order_status?order_uid=ORD000").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Order not found");

    let (status, body) = get(&app, "/api/order_status").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required parameter: order_uid");
}

#[tokio::test]
async fn test_place_order_validation() {
    let (app, db) = app().await;

    let (status, body) = post(&app, "/api/orders", json!({"branch_id": 1, "order_type": "dine-in"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required field: items");

    let mut bad_type = order_body(None);
    bad_type["order_type"] = json!("drive-thru");
    let (status, _) = post(&app, "/api/orders", bad_type).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut zero = order_body(None);
    zero["items"][0]["quantity"] = json!(0);
    let (status, _) = post(&app, "/api/orders", zero).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut empty = order_body(None);
    empty["items"] = json!([]);
    let (status, _) = post(&app, "/api/orders", empty).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(order_count(&db).await, 2);
}

#[tokio::test]
async fn test_place_order_unknown_item() {
    let (app, _db) = app().await;
    let mut body = order_body(None);
    body["items"][1]["branch_menu_item_id"] = json!(9999);

    let (status, body) = post(&app, "/api/orders", body).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Invalid menu item");
}

#[tokio::test]
async fn test_place_order_table_of_other_branch() {
    let (app, _db) = app().await;
    let mut body = order_body(None);
    body["table_id"] = json!(10);

    let (status, body) = post(&app, "/api/orders", body).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Invalid table for this branch");
}

#[tokio::test]
async fn test_malformed_json() {
    let (app, _db) = app().await;
    let request = Request::post("/api/orders")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));
}

// =============================================================================
// Promo, Feedback, Service Requests
// =============================================================================

#[tokio::test]
async fn test_promocode() {
    let (app, _db) = app().await;

    let (status, body) = post(&app, "/api/promocode", json!({"code": "SAVE20"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "SAVE20");
    assert_eq!(body["type"], "fixed");
    assert_eq!(body["discount"], 20.0);
    assert_eq!(body["min_order_amount"], 300.0);

    let (status, body) = post(&app, "/api/promocode", json!({"code": "EXPIRED"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Invalid or expired promo code");

    let (status, body) = post(&app, "/api/promocode", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Promo code is required");
}

#[tokio::test]
async fn test_promocode_empty_code_is_not_found() {
    let (app, _db) = app().await;

    for code in ["", "   "] {
        let (status, body) = post(&app, "/api/promocode", json!({ "code": code })).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Invalid or expired promo code");
    }
}

#[tokio::test]
async fn test_feedback() {
    let (app, db) = app().await;

    let (status, body) = post(
        &app,
        "/api/feedback",
        json!({"order_id": "ORD987654321", "ratings": {"overall": 3}}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));
    assert_eq!(db.feedback().list_for_order(2).await.unwrap().len(), 1);

    for overall in [0, 6] {
        let (status, _) = post(
            &app,
            "/api/feedback",
            json!({"order_id": "ORD987654321", "ratings": {"overall": overall}}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, body) = post(
        &app,
        "/api/feedback",
        json!({"order_id": "ORDNOPE", "ratings": {"overall": 4}}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Order not found");

    let (status, body) = post(&app, "/api/feedback", json!({"order_id": "ORD987654321"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required field: ratings");
}

#[tokio::test]
async fn test_service_request() {
    let (app, db) = app().await;

    let (status, body) = post(
        &app,
        "/api/service_request",
        json!({"branch_id": 2, "table_id": 9, "request_type": "bill"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));
    assert_eq!(db.service_requests().list_pending(2).await.unwrap().len(), 1);

    let (status, body) = post(
        &app,
        "/api/service_request",
        json!({"branch_id": 1, "table_id": 9, "request_type": "bill"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Invalid table for this branch");

    let (status, _) = post(
        &app,
        "/api/service_request",
        json!({"branch_id": 2, "table_id": 9, "request_type": "napkins"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(db.service_requests().list_pending(2).await.unwrap().len(), 1);
}

// =============================================================================
// Routing
// =============================================================================

#[tokio::test]
async fn test_unknown_endpoint() {
    let (app, _db) = app().await;
    let (status, body) = get(&app, "/api/nothing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Endpoint not found");
}

#[tokio::test]
async fn test_wrong_method() {
    let (app, _db) = app().await;

    let (status, body) = post(&app, "/api/branches", json!({})).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed");

    let (status, body) = get(&app, "/api/orders").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed");
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _db) = app().await;
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/orders")
        .header(header::ORIGIN, "https://menu.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
