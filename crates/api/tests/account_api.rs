//! Integration tests for account deletion.

mod common;

use axum::http::StatusCode;
use common::{auth_token, body_json, build_test_app, create_listing, delete, get, put_json};
use sqlx::PgPool;
use uuid::Uuid;

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_account_without_token_returns_401(pool: PgPool) {
    let app = build_test_app(pool);
    let response = delete(app, "/api/v1/account", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_account_removes_all_owner_data(pool: PgPool) {
    let user_id = Uuid::new_v4();
    let token = auth_token(user_id);

    // Seed a listing, an appointment on it, and a profile.
    let listing = create_listing(&pool, &token, "Wird gelöscht", Some("entwurf")).await;
    let listing_id = listing["id"].as_i64().unwrap();

    let app = build_test_app(pool.clone());
    let response = common::post_json(
        app,
        "/api/v1/appointments",
        Some(&token),
        serde_json::json!({
            "listing_id": listing_id,
            "title": "Besichtigung",
            "starts_at": "2026-09-15T10:00:00Z",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = build_test_app(pool.clone());
    let response = put_json(
        app,
        "/api/v1/profile",
        Some(&token),
        serde_json::json!({ "first_name": "Max" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Delete everything.
    let app = build_test_app(pool.clone());
    let response = delete(app, "/api/v1/account", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Listings and appointments are gone.
    let app = build_test_app(pool.clone());
    let response = get(app, "/api/v1/listings", Some(&token)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);

    let app = build_test_app(pool.clone());
    let response = get(app, "/api/v1/appointments", Some(&token)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);

    // A fresh profile is lazily recreated on next read, without the old data.
    let app = build_test_app(pool);
    let response = get(app, "/api/v1/profile", Some(&token)).await;
    let json = body_json(response).await;
    assert!(json["data"]["first_name"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_account_leaves_other_owners_untouched(pool: PgPool) {
    let alice = auth_token(Uuid::new_v4());
    let bob = auth_token(Uuid::new_v4());
    create_listing(&pool, &alice, "Alices Wohnung", None).await;
    create_listing(&pool, &bob, "Bobs Wohnung", None).await;

    let app = build_test_app(pool.clone());
    let response = delete(app, "/api/v1/account", Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = build_test_app(pool);
    let response = get(app, "/api/v1/listings", Some(&bob)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}
