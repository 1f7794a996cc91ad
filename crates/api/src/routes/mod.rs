pub mod account;
pub mod appointments;
pub mod bookings;
pub mod checkout;
pub mod health;
pub mod listings;
pub mod profile;
pub mod seo;
pub mod webhooks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /listings                        list, create
/// /listings/{id}                   get, update, delete
///
/// /appointments                    list, create
/// /appointments/{id}               update, delete
///
/// /profile                         get (lazily creates), update
///
/// /bookings                        derived invoice projection (GET)
///
/// /checkout/listings/{id}          create hosted checkout session (POST)
///
/// /webhooks/payments               signed payment webhook (POST, public)
///
/// /account                         delete all caller data (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/listings", listings::router())
        .nest("/appointments", appointments::router())
        .nest("/profile", profile::router())
        .nest("/bookings", bookings::router())
        .nest("/checkout", checkout::router())
        .nest("/webhooks", webhooks::router())
        .nest("/account", account::router())
}
