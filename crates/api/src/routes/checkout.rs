//! Route definitions for the `/checkout` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::checkout;
use crate::state::AppState;

/// Routes mounted at `/checkout`.
///
/// ```text
/// POST /listings/{id}  -> create_listing_checkout
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/listings/{id}", post(checkout::create_listing_checkout))
}
