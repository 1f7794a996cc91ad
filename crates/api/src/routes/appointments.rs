//! Route definitions for the `/appointments` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::appointments;
use crate::state::AppState;

/// Routes mounted at `/appointments`.
///
/// ```text
/// GET    /           -> list
/// POST   /           -> create
/// PUT    /{id}       -> update
/// DELETE /{id}       -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(appointments::list).post(appointments::create))
        .route(
            "/{id}",
            put(appointments::update).delete(appointments::delete),
        )
}
