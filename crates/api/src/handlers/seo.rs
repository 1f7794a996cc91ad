//! Public SEO artifacts: sitemap and robots.

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use immopilot_db::repositories::ListingRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// Maximum number of listing URLs in the sitemap.
const SITEMAP_LIMIT: i64 = 5_000;

/// GET /sitemap.xml
///
/// Static marketing pages plus one URL per active listing.
pub async fn sitemap(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let base = &state.config.public_base_url;
    let listings = ListingRepo::list_active(&state.pool, SITEMAP_LIMIT).await?;

    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");

    for path in ["", "/anzeigen", "/preise", "/docs", "/agb", "/impressum", "/datenschutz"] {
        xml.push_str(&format!("  <url><loc>{base}{path}</loc></url>\n"));
    }

    for listing in listings {
        let lastmod = listing.updated_at.format("%Y-%m-%d");
        xml.push_str(&format!(
            "  <url><loc>{base}/anzeigen/{}</loc><lastmod>{lastmod}</lastmod></url>\n",
            listing.id
        ));
    }

    xml.push_str("</urlset>\n");

    Ok(([(CONTENT_TYPE, "application/xml")], xml))
}

/// GET /robots.txt
pub async fn robots(State(state): State<AppState>) -> impl IntoResponse {
    let base = &state.config.public_base_url;
    let body = format!(
        "User-agent: *\nAllow: /\nDisallow: /api/\nDisallow: /konto/\n\nSitemap: {base}/sitemap.xml\n"
    );
    ([(CONTENT_TYPE, "text/plain")], body)
}
