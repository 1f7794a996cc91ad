//! Route definitions for the `/bookings` projection.

use axum::routing::get;
use axum::Router;

use crate::handlers::bookings;
use crate::state::AppState;

/// Routes mounted at `/bookings`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(bookings::list))
}
