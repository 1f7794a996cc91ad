//! Integration tests for the appointments API.

mod common;

use axum::http::StatusCode;
use common::{auth_token, body_json, build_test_app, create_listing, delete, get, post_json, put_json};
use sqlx::PgPool;
use uuid::Uuid;

async fn create_appointment(pool: &PgPool, token: &str, listing_id: i64) -> serde_json::Value {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/appointments",
        Some(token),
        serde_json::json!({
            "listing_id": listing_id,
            "title": "Besichtigung",
            "starts_at": "2026-09-15T10:00:00Z",
            "ends_at": "2026-09-15T11:00:00Z",
            "contact_name": "Familie Schmidt",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_and_list_appointments(pool: PgPool) {
    let token = auth_token(Uuid::new_v4());
    let listing = create_listing(&pool, &token, "Wohnung", Some("entwurf")).await;
    let appointment = create_appointment(&pool, &token, listing["id"].as_i64().unwrap()).await;

    assert_eq!(appointment["title"], "Besichtigung");
    assert_eq!(appointment["contact_name"], "Familie Schmidt");

    let app = build_test_app(pool);
    let response = get(app, "/api/v1/appointments", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_rejects_foreign_listing(pool: PgPool) {
    let alice = auth_token(Uuid::new_v4());
    let bob = auth_token(Uuid::new_v4());
    let listing = create_listing(&pool, &alice, "Alices Wohnung", Some("entwurf")).await;

    let app = build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/appointments",
        Some(&bob),
        serde_json::json!({
            "listing_id": listing["id"].as_i64().unwrap(),
            "title": "Fremde Besichtigung",
            "starts_at": "2026-09-15T10:00:00Z",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_rejects_end_before_start(pool: PgPool) {
    let token = auth_token(Uuid::new_v4());
    let listing = create_listing(&pool, &token, "Wohnung", Some("entwurf")).await;

    let app = build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/appointments",
        Some(&token),
        serde_json::json!({
            "listing_id": listing["id"].as_i64().unwrap(),
            "title": "Rückwärts",
            "starts_at": "2026-09-15T11:00:00Z",
            "ends_at": "2026-09-15T10:00:00Z",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_appointment_patches_fields(pool: PgPool) {
    let token = auth_token(Uuid::new_v4());
    let listing = create_listing(&pool, &token, "Wohnung", Some("entwurf")).await;
    let appointment = create_appointment(&pool, &token, listing["id"].as_i64().unwrap()).await;
    let id = appointment["id"].as_i64().unwrap();

    let app = build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/appointments/{id}"),
        Some(&token),
        serde_json::json!({ "notes": "Schlüssel beim Nachbarn" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["notes"], "Schlüssel beim Nachbarn");
    assert_eq!(json["data"]["title"], "Besichtigung");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_appointment_returns_204(pool: PgPool) {
    let token = auth_token(Uuid::new_v4());
    let listing = create_listing(&pool, &token, "Wohnung", Some("entwurf")).await;
    let appointment = create_appointment(&pool, &token, listing["id"].as_i64().unwrap()).await;
    let id = appointment["id"].as_i64().unwrap();

    let app = build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/appointments/{id}"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = build_test_app(pool);
    let response = get(app, "/api/v1/appointments", Some(&token)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deleting_listing_cascades_appointments(pool: PgPool) {
    let token = auth_token(Uuid::new_v4());
    let listing = create_listing(&pool, &token, "Wohnung", Some("entwurf")).await;
    let listing_id = listing["id"].as_i64().unwrap();
    create_appointment(&pool, &token, listing_id).await;

    let app = build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/listings/{listing_id}"), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = build_test_app(pool);
    let response = get(app, "/api/v1/appointments", Some(&token)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}
