//! Integration tests for the signed payment webhook.
//!
//! Requests are signed with the same helper the payments crate exposes for
//! local tooling, using the test webhook secret from `common`.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{auth_token, body_json, build_test_app, create_listing, get, TEST_WEBHOOK_SECRET};
use immopilot_payments::sign_payload;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

/// Send `payload` to the webhook endpoint with the given signature header.
async fn post_webhook(
    pool: PgPool,
    payload: &str,
    signature: Option<&str>,
) -> axum::http::Response<Body> {
    let app = build_test_app(pool);
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/v1/webhooks/payments")
        .header("content-type", "application/json");
    if let Some(sig) = signature {
        builder = builder.header("x-payment-signature", sig);
    }
    let request = builder.body(Body::from(payload.to_string())).unwrap();
    app.oneshot(request).await.unwrap()
}

fn sign(payload: &str) -> String {
    sign_payload(
        payload.as_bytes(),
        TEST_WEBHOOK_SECRET,
        chrono::Utc::now().timestamp(),
    )
}

fn completed_session_event(listing_id: i64, mode: &str, kind: &str) -> String {
    serde_json::json!({
        "id": "evt_test_1",
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": "cs_test_1",
                "mode": mode,
                "customer": "cus_test_1",
                "payment_intent": "pi_test_1",
                "metadata": {
                    "kind": kind,
                    "listing_id": listing_id.to_string(),
                }
            }
        }
    })
    .to_string()
}

// ---------------------------------------------------------------------------
// checkout.session.completed
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn completed_session_queues_listing_for_syndication(pool: PgPool) {
    let token = auth_token(Uuid::new_v4());
    let listing = create_listing(&pool, &token, "Bezahlte Wohnung", None).await;
    let id = listing["id"].as_i64().unwrap();

    let payload = completed_session_event(id, "payment", "listing");
    let response = post_webhook(pool.clone(), &payload, Some(&sign(&payload))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["received"], true);

    let app = build_test_app(pool);
    let response = get(app, &format!("/api/v1/listings/{id}"), Some(&token)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["ui_status"], "wird_veroeffentlicht");
    assert_eq!(json["data"]["payment_intent_id"], "pi_test_1");
    assert!(json["data"]["paid_at"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn completed_session_is_idempotent(pool: PgPool) {
    let token = auth_token(Uuid::new_v4());
    let listing = create_listing(&pool, &token, "Doppelt zugestellt", None).await;
    let id = listing["id"].as_i64().unwrap();

    let payload = completed_session_event(id, "payment", "listing");
    let first = post_webhook(pool.clone(), &payload, Some(&sign(&payload))).await;
    assert_eq!(first.status(), StatusCode::OK);

    let app = build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/listings/{id}"), Some(&token)).await;
    let paid_at = body_json(response).await["data"]["paid_at"].clone();

    // At-least-once delivery: a replay must ack and leave the row unchanged.
    let second = post_webhook(pool.clone(), &payload, Some(&sign(&payload))).await;
    assert_eq!(second.status(), StatusCode::OK);

    let app = build_test_app(pool);
    let response = get(app, &format!("/api/v1/listings/{id}"), Some(&token)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["ui_status"], "wird_veroeffentlicht");
    assert_eq!(json["data"]["paid_at"], paid_at);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn replay_after_publication_does_not_regress_status(pool: PgPool) {
    let token = auth_token(Uuid::new_v4());
    let listing = create_listing(&pool, &token, "Bereits veröffentlicht", None).await;
    let id = listing["id"].as_i64().unwrap();

    let payload = completed_session_event(id, "payment", "listing");
    let first = post_webhook(pool.clone(), &payload, Some(&sign(&payload))).await;
    assert_eq!(first.status(), StatusCode::OK);

    // The sync worker has since pushed the listing to the portals.
    sqlx::query(
        "UPDATE listings SET status_id = 4, published_at = NOW(),
         syndication_listing_id = 'sl_test_1' WHERE id = $1",
    )
    .bind(id)
    .execute(&pool)
    .await
    .unwrap();

    // A late duplicate must ack without re-queueing the listing for sync,
    // which would publish it a second time.
    let replay = post_webhook(pool.clone(), &payload, Some(&sign(&payload))).await;
    assert_eq!(replay.status(), StatusCode::OK);

    let app = build_test_app(pool);
    let response = get(app, &format!("/api/v1/listings/{id}"), Some(&token)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["ui_status"], "aktiv");
    assert_eq!(json["data"]["syndication_listing_id"], "sl_test_1");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn non_payment_mode_session_is_ignored(pool: PgPool) {
    let token = auth_token(Uuid::new_v4());
    let listing = create_listing(&pool, &token, "Abo-Session", None).await;
    let id = listing["id"].as_i64().unwrap();

    let payload = completed_session_event(id, "subscription", "listing");
    let response = post_webhook(pool.clone(), &payload, Some(&sign(&payload))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = build_test_app(pool);
    let response = get(app, &format!("/api/v1/listings/{id}"), Some(&token)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["ui_status"], "zahlung_ausstehend");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn session_without_listing_metadata_is_ignored(pool: PgPool) {
    let token = auth_token(Uuid::new_v4());
    let listing = create_listing(&pool, &token, "Fremde Metadaten", None).await;
    let id = listing["id"].as_i64().unwrap();

    let payload = completed_session_event(id, "payment", "subscription");
    let response = post_webhook(pool.clone(), &payload, Some(&sign(&payload))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = build_test_app(pool);
    let response = get(app, &format!("/api/v1/listings/{id}"), Some(&token)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["ui_status"], "zahlung_ausstehend");
}

// ---------------------------------------------------------------------------
// Signature verification
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_signature_returns_400(pool: PgPool) {
    let payload = completed_session_event(1, "payment", "listing");
    let response = post_webhook(pool, &payload, None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn wrong_secret_returns_400_without_state_change(pool: PgPool) {
    let token = auth_token(Uuid::new_v4());
    let listing = create_listing(&pool, &token, "Gefälschte Signatur", None).await;
    let id = listing["id"].as_i64().unwrap();

    let payload = completed_session_event(id, "payment", "listing");
    let forged = sign_payload(
        payload.as_bytes(),
        "whsec_wrong",
        chrono::Utc::now().timestamp(),
    );
    let response = post_webhook(pool.clone(), &payload, Some(&forged)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = build_test_app(pool);
    let response = get(app, &format!("/api/v1/listings/{id}"), Some(&token)).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["ui_status"], "zahlung_ausstehend");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn stale_timestamp_returns_400(pool: PgPool) {
    let payload = completed_session_event(1, "payment", "listing");
    // Signed an hour ago, well past the 300s tolerance.
    let stale = sign_payload(
        payload.as_bytes(),
        TEST_WEBHOOK_SECRET,
        chrono::Utc::now().timestamp() - 3600,
    );
    let response = post_webhook(pool, &payload, Some(&stale)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn tampered_payload_returns_400(pool: PgPool) {
    let payload = completed_session_event(1, "payment", "listing");
    let signature = sign(&payload);
    let tampered = payload.replace("\"listing_id\":\"1\"", "\"listing_id\":\"2\"");
    let response = post_webhook(pool, &tampered, Some(&signature)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// checkout.session.expired
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn expired_session_clears_stored_session_id(pool: PgPool) {
    let token = auth_token(Uuid::new_v4());
    let listing = create_listing(&pool, &token, "Abgelaufene Session", None).await;
    let id = listing["id"].as_i64().unwrap();

    // Simulate a previously started checkout.
    sqlx::query("UPDATE listings SET checkout_session_id = 'cs_test_exp' WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

    let payload = serde_json::json!({
        "id": "evt_test_2",
        "type": "checkout.session.expired",
        "data": { "object": { "id": "cs_test_exp", "mode": "payment", "metadata": {} } }
    })
    .to_string();
    let response = post_webhook(pool.clone(), &payload, Some(&sign(&payload))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = build_test_app(pool);
    let response = get(app, &format!("/api/v1/listings/{id}"), Some(&token)).await;
    let json = body_json(response).await;
    assert!(json["data"]["checkout_session_id"].is_null());
    // The listing itself stays payable.
    assert_eq!(json["data"]["ui_status"], "zahlung_ausstehend");
}

// ---------------------------------------------------------------------------
// Unknown events
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_event_type_is_acknowledged(pool: PgPool) {
    let payload = serde_json::json!({
        "id": "evt_test_3",
        "type": "invoice.finalized",
        "data": { "object": {} }
    })
    .to_string();
    let response = post_webhook(pool, &payload, Some(&sign(&payload))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["received"], true);
}
