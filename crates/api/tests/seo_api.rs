//! Integration tests for the public SEO artifacts.

mod common;

use axum::http::StatusCode;
use common::{auth_token, build_test_app, create_listing, get};
use http_body_util::BodyExt;
use sqlx::PgPool;
use uuid::Uuid;

async fn body_string(response: axum::http::Response<axum::body::Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn robots_txt_disallows_private_paths(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/robots.txt", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/plain"
    );

    let body = body_string(response).await;
    assert!(body.contains("Disallow: /api/"));
    assert!(body.contains("Disallow: /konto/"));
    assert!(body.contains("Sitemap: http://localhost:5173/sitemap.xml"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn sitemap_contains_static_pages(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/sitemap.xml", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/xml"
    );

    let body = body_string(response).await;
    assert!(body.contains("<loc>http://localhost:5173/preise</loc>"));
    assert!(body.contains("<loc>http://localhost:5173/docs</loc>"));
    assert!(body.contains("<loc>http://localhost:5173/impressum</loc>"));
    assert!(body.contains("<loc>http://localhost:5173/datenschutz</loc>"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn sitemap_includes_active_listings_only(pool: PgPool) {
    let token = auth_token(Uuid::new_v4());
    let active = create_listing(&pool, &token, "Aktive Wohnung", None).await;
    let active_id = active["id"].as_i64().unwrap();
    let draft = create_listing(&pool, &token, "Entwurf", Some("entwurf")).await;
    let draft_id = draft["id"].as_i64().unwrap();

    // Activation happens through payment and syndication; flip the row
    // directly for the projection test.
    sqlx::query("UPDATE listings SET status_id = 4, published_at = NOW() WHERE id = $1")
        .bind(active_id)
        .execute(&pool)
        .await
        .unwrap();

    let app = build_test_app(pool);
    let response = get(app, "/sitemap.xml", None).await;
    let body = body_string(response).await;

    assert!(body.contains(&format!("<loc>http://localhost:5173/anzeigen/{active_id}</loc>")));
    assert!(!body.contains(&format!("<loc>http://localhost:5173/anzeigen/{draft_id}</loc>")));
}
