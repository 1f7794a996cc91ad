//! Route definitions for the `/listings` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::listings;
use crate::state::AppState;

/// Routes mounted at `/listings`.
///
/// ```text
/// GET    /           -> list
/// POST   /           -> create
/// GET    /{id}       -> get_by_id
/// PUT    /{id}       -> update
/// DELETE /{id}       -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(listings::list).post(listings::create))
        .route(
            "/{id}",
            get(listings::get_by_id)
                .put(listings::update)
                .delete(listings::delete),
        )
}
