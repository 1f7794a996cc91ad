//! Route definitions for the `/account` resource.

use axum::routing::delete;
use axum::Router;

use crate::handlers::account;
use crate::state::AppState;

/// Routes mounted at `/account`.
///
/// ```text
/// DELETE /  -> delete_account
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", delete(account::delete_account))
}
