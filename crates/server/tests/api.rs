use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::{Database, DatabaseConnection, EntityTrait, PaginatorTrait};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use server::{REQUEST_TIMEOUT_HEADER, ServerState};

async fn app() -> (Router, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db.clone()).build().unwrap();
    let state = ServerState {
        engine: Arc::new(engine),
    };
    (server::router(state), db)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_category(app: &Router, name: &str, kind: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/categories",
        Some(json!({ "name": name, "type": kind })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["uuid"].as_str().unwrap().to_string()
}

async fn create_operation(app: &Router, category: &str, money_sum: f64) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/operations",
        Some(json!({ "category_uuid": category, "money_sum": money_sum, "description": "lunch" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["uuid"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn heartbeat_returns_no_content() {
    let (app, _db) = app().await;
    let (status, _) = send(&app, "GET", "/api/heartbeat", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn created_category_is_readable_at_location() {
    let (app, _db) = app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/categories")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":"Salary","type":"Income"}"#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(location.starts_with("/api/categories/one/"));

    let (status, body) = send(&app, "GET", &location, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Salary");
    assert_eq!(body["type"], "Income");
    assert_eq!(body["version"], 1);
    assert!(body["user_uuid"].is_null());
}

#[tokio::test]
async fn empty_category_patch_is_a_noop() {
    let (app, _db) = app().await;
    let id = create_category(&app, "Salary", "Income").await;
    let uri = format!("/api/categories/one/{id}");

    let (status, _) = send(&app, "PATCH", &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(body["name"], "Salary");
    assert_eq!(body["version"], 1);
}

#[tokio::test]
async fn category_rename_bumps_version_and_stale_version_conflicts() {
    let (app, _db) = app().await;
    let id = create_category(&app, "Food", "Expense").await;
    let uri = format!("/api/categories/one/{id}");

    let (status, _) = send(&app, "PATCH", &uri, Some(json!({ "name": "Groceries", "version": 1 }))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(body["name"], "Groceries");
    assert_eq!(body["version"], 2);

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "name": "Market", "version": 1 }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "conflict");
}

#[tokio::test]
async fn duplicate_category_name_is_rejected() {
    let (app, _db) = app().await;
    create_category(&app, "Salary", "Income").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/categories",
        Some(json!({ "name": "  salary ", "type": "Income" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");
}

#[tokio::test]
async fn category_create_rejects_bad_shapes() {
    let (app, _db) = app().await;

    let (status, _) = send(&app, "POST", "/api/categories", Some(json!({ "name": "", "type": "Income" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/api/categories", Some(json!({ "name": "Rent", "type": "Loan" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method("POST")
        .uri("/api/categories")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name": "Rent""#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_path_uuid_is_bad_request() {
    let (app, _db) = app().await;
    let (status, body) = send(&app, "GET", "/api/categories/one/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "bad_request");

    let (status, _) = send(&app, "DELETE", "/api/operations/one/42", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn categories_are_listed_by_user_and_found_by_name() {
    let (app, _db) = app().await;
    let user = uuid::Uuid::new_v4();

    let (status, _) = send(
        &app,
        "POST",
        "/api/categories",
        Some(json!({ "name": "Coffee", "type": "Expense", "user_uuid": user })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    create_category(&app, "Salary", "Income").await;

    let (status, body) = send(&app, "GET", &format!("/api/categories/user_uuid/{user}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Coffee");

    let other = uuid::Uuid::new_v4();
    let (status, body) = send(&app, "GET", &format!("/api/categories/user_uuid/{other}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = send(&app, "GET", &format!("/api/categories/name/coffee?user_uuid={user}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Coffee");

    let (status, _) = send(&app, "GET", "/api/categories/name/coffee", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", "/api/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn operation_with_missing_category_is_not_created() {
    let (app, db) = app().await;
    let missing = uuid::Uuid::new_v4();

    let (status, body) = send(
        &app,
        "POST",
        "/api/operations",
        Some(json!({ "category_uuid": missing, "money_sum": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");

    let rows = engine::operations::Entity::find().count(&db).await.unwrap();
    assert_eq!(rows, 0);
}

#[tokio::test]
async fn operation_lifecycle() {
    let (app, _db) = app().await;
    let category = create_category(&app, "Food", "Expense").await;
    let id = create_operation(&app, &category, 12.5).await;
    let uri = format!("/api/operations/one/{id}");

    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["money_sum"], 12.5);
    assert_eq!(body["description"], "lunch");
    assert_eq!(body["category_uuid"], category.as_str());
    let created_at = body["date_time"].clone();

    let (status, _) = send(&app, "PATCH", &uri, Some(json!({ "money_sum": 0, "description": "" }))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(body["money_sum"], 0.0);
    assert!(body["description"].is_null());
    assert_eq!(body["date_time"], created_at);
    assert_eq!(body["version"], 2);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn operation_money_is_validated() {
    let (app, _db) = app().await;
    let category = create_category(&app, "Food", "Expense").await;

    for money_sum in [0.0, -3.0, 1.234] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/operations",
            Some(json!({ "category_uuid": category, "money_sum": money_sum })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "money_sum {money_sum}");
    }

    create_operation(&app, &category, 0.01).await;
}

#[tokio::test]
async fn referenced_category_can_not_be_deleted() {
    let (app, _db) = app().await;
    let category = create_category(&app, "Food", "Expense").await;
    create_operation(&app, &category, 5.0).await;

    let (status, body) = send(&app, "DELETE", &format!("/api/categories/one/{category}"), None).await;
    assert_eq!(status, StatusCode::IM_A_TEAPOT);
    assert_eq!(body["kind"], "domain_logic");
}

#[tokio::test]
async fn operation_patch_to_missing_category_is_not_found() {
    let (app, _db) = app().await;
    let category = create_category(&app, "Food", "Expense").await;
    let id = create_operation(&app, &category, 5.0).await;

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/operations/one/{id}"),
        Some(json!({ "category_uuid": uuid::Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_timeout_header_is_bad_request() {
    let (app, _db) = app().await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/categories")
        .header(REQUEST_TIMEOUT_HEADER, "soon")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method("GET")
        .uri("/api/categories")
        .header(REQUEST_TIMEOUT_HEADER, "2000")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
