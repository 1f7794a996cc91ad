//! Root-level SEO artifact routes (sitemap, robots).

use axum::routing::get;
use axum::Router;

use crate::handlers::seo;
use crate::state::AppState;

/// Routes mounted at `/` (outside `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sitemap.xml", get(seo::sitemap))
        .route("/robots.txt", get(seo::robots))
}
