use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use server::{ServerState, router};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    for name in ["alice", "bob", "carol"] {
        engine
            .register_user(name, &format!("{name}@example.com"), "password")
            .await
            .unwrap();
    }
    router(ServerState {
        engine: Arc::new(engine),
    })
}

fn basic(user: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:password")))
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(header::AUTHORIZATION, basic(user));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn call_json(
    app: &Router,
    method: &str,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, bytes) = call(app, method, uri, user, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn trip(app: &Router) -> String {
    let (status, group) = call_json(
        app,
        "POST",
        "/groups",
        Some("alice"),
        Some(json!({ "name": "Trip", "description": "Summer" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = group["id"].as_str().unwrap().to_string();

    for member in ["bob", "carol"] {
        let (status, _) = call_json(
            app,
            "POST",
            &format!("/groups/{id}/members"),
            Some("alice"),
            Some(json!({ "username": member })),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
    id
}

#[tokio::test]
async fn routes_require_basic_auth_except_register() {
    let app = app().await;

    let (status, _) = call(&app, "GET", "/user/details", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, "GET", "/balances", Some("mallory"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, user) = call_json(
        &app,
        "POST",
        "/register",
        None,
        Some(json!({ "username": "dave", "email": "dave@example.com", "password": "password" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["username"], "dave");

    let (status, me) = call_json(&app, "GET", "/user/details", Some("dave"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "dave@example.com");

    let (status, found) =
        call_json(&app, "GET", "/user?email=bob@example.com", Some("dave"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["username"], "bob");

    let (status, _) = call_json(&app, "GET", "/user", Some("dave"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn expense_flow_updates_balances() {
    let app = app().await;
    let group = trip(&app).await;

    let (status, expense) = call_json(
        &app,
        "POST",
        "/expenses",
        Some("alice"),
        Some(json!({ "group_id": group, "amount_minor": 10_000, "description": "dinner" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(expense["paid_by"], "alice");

    let (status, balances) = call_json(&app, "GET", "/balances", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(balances["total_minor"], 6_666);
    assert_eq!(balances["balances"][0]["borrower"], "bob");
    assert_eq!(balances["balances"][0]["amount_minor"], 3_333);

    let (_, total) = call_json(
        &app,
        "GET",
        &format!("/groups/{group}/balance"),
        Some("bob"),
        None,
    )
    .await;
    assert_eq!(total["balance_minor"], -3_333);

    let (_, members) = call_json(
        &app,
        "GET",
        &format!("/groups/{group}/members"),
        Some("alice"),
        None,
    )
    .await;
    assert_eq!(members["members"].as_array().unwrap().len(), 3);

    let (_, expenses) = call_json(
        &app,
        "GET",
        &format!("/groups/{group}/expenses"),
        Some("carol"),
        None,
    )
    .await;
    assert_eq!(expenses["expenses"][0]["description"], "dinner");
}

#[tokio::test]
async fn members_can_log_what_someone_else_paid() {
    let app = app().await;
    let group = trip(&app).await;

    let (status, expense) = call_json(
        &app,
        "POST",
        "/expenses",
        Some("alice"),
        Some(json!({ "group_id": group, "paid_by": "bob", "amount_minor": 9_00 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(expense["paid_by"], "bob");

    let (_, balances) = call_json(
        &app,
        "GET",
        &format!("/groups/{group}/balances"),
        Some("bob"),
        None,
    )
    .await;
    assert_eq!(balances["total_minor"], 6_00);
    assert_eq!(balances["balances"][0]["borrower"], "alice");
    assert_eq!(balances["balances"][0]["amount_minor"], 3_00);
    assert_eq!(balances["balances"][1]["borrower"], "carol");
    assert_eq!(balances["balances"][1]["amount_minor"], 3_00);

    let (status, _) = call_json(
        &app,
        "POST",
        "/register",
        None,
        Some(json!({ "username": "mallory", "email": "mallory@example.com", "password": "password" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = call_json(
        &app,
        "POST",
        "/expenses",
        Some("mallory"),
        Some(json!({ "group_id": group, "paid_by": "bob", "amount_minor": 9_00 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn engine_errors_map_to_statuses() {
    let app = app().await;
    let group = trip(&app).await;

    let (status, body) = call_json(
        &app,
        "POST",
        "/expenses",
        Some("alice"),
        Some(json!({ "group_id": group, "amount_minor": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("amount_minor"));

    call_json(
        &app,
        "POST",
        "/expenses",
        Some("alice"),
        Some(json!({ "group_id": group, "amount_minor": 3_00 })),
    )
    .await;
    let (status, _) = call_json(
        &app,
        "DELETE",
        &format!("/groups/{group}/members/bob"),
        Some("alice"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call_json(
        &app,
        "POST",
        "/settle",
        Some("alice"),
        Some(json!({ "counterpart": "nobody" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call_json(
        &app,
        "POST",
        "/register",
        None,
        Some(json!({ "username": "bob", "email": "new@example.com", "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn settle_then_export_payments() {
    let app = app().await;
    let group = trip(&app).await;
    call_json(
        &app,
        "POST",
        "/expenses",
        Some("bob"),
        Some(json!({ "group_id": group, "amount_minor": 9_00 })),
    )
    .await;

    let (status, payment) = call_json(
        &app,
        "POST",
        "/settle",
        Some("alice"),
        Some(json!({ "counterpart": "bob" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(payment["amount_minor"], 3_00);

    let (_, members) = call_json(
        &app,
        "GET",
        &format!("/groups/{group}/members"),
        Some("bob"),
        None,
    )
    .await;
    let alice = members["members"]
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["username"] == "alice")
        .unwrap();
    assert_eq!(alice["balance_minor"], 0);

    let (_, payments) = call_json(&app, "GET", "/payments", Some("bob"), None).await;
    assert_eq!(payments["payments"][0]["paid_by"], "alice");

    let (status, csv) = call(&app, "GET", "/payments/csv", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    let csv = String::from_utf8(csv).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("ID,Amount,Date,Paid By,Paid To"));
    let row = lines.next().unwrap();
    assert!(row.contains(",3.00,"));
    assert!(row.ends_with(",alice,bob"));

    let (status, reminder) = call_json(
        &app,
        "POST",
        "/remind",
        Some("carol"),
        Some(json!({ "counterpart": "bob", "amount_minor": 3_00 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reminder["sent_to"], "bob");
}

#[tokio::test]
async fn non_members_are_forbidden() {
    let app = app().await;
    let (_, group) = call_json(
        &app,
        "POST",
        "/groups",
        Some("alice"),
        Some(json!({ "name": "Solo" })),
    )
    .await;
    let id = group["id"].as_str().unwrap();

    let (status, _) = call_json(
        &app,
        "GET",
        &format!("/groups/{id}/expenses"),
        Some("bob"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, groups) = call_json(&app, "GET", "/groups", Some("bob"), None).await;
    assert!(groups["groups"].as_array().unwrap().is_empty());
}
