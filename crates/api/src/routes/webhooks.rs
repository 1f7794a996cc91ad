//! Route definitions for incoming vendor webhooks.

use axum::routing::post;
use axum::Router;

use crate::handlers::webhooks;
use crate::state::AppState;

/// Routes mounted at `/webhooks`.
///
/// ```text
/// POST /payments  -> receive_payment_event (public, signature-verified)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/payments", post(webhooks::receive_payment_event))
}
