//! Handler for the `/bookings` projection.
//!
//! Bookings are not stored: the list is assembled per request from the
//! payment processor's invoices for the caller's customer id, joined
//! in-process against listing titles via the stored payment intent.

use std::collections::HashMap;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use immopilot_core::types::DbId;
use immopilot_db::repositories::{ListingRepo, ProfileRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// One row of the bookings projection.
#[derive(Debug, Serialize)]
pub struct Booking {
    pub invoice_id: String,
    pub status: String,
    pub amount_cents: i64,
    pub currency: String,
    /// Unix timestamp of invoice creation.
    pub created: i64,
    pub hosted_invoice_url: Option<String>,
    /// The listing this invoice paid for, when it could be matched.
    pub listing_id: Option<DbId>,
    pub listing_title: Option<String>,
}

/// GET /api/v1/bookings
///
/// Empty list when the caller has no payment customer yet or the payment
/// processor is not configured.
pub async fn list(user: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let profile = ProfileRepo::ensure(&state.pool, user.user_id, user.email.as_deref()).await?;

    let (Some(payments), Some(customer_id)) =
        (state.payments.as_ref(), profile.payment_customer_id)
    else {
        return Ok(Json(DataResponse {
            data: Vec::<Booking>::new(),
        }));
    };

    let invoices = payments
        .list_invoices(&customer_id)
        .await
        .map_err(|e| AppError::InternalError(format!("Invoice listing failed: {e}")))?;

    // Join invoices to listings by payment intent, in-process.
    let listings = ListingRepo::list_with_payment_intent(&state.pool, user.user_id).await?;
    let by_intent: HashMap<&str, (DbId, &str)> = listings
        .iter()
        .filter_map(|l| {
            l.payment_intent_id
                .as_deref()
                .map(|pi| (pi, (l.id, l.title.as_str())))
        })
        .collect();

    let bookings: Vec<Booking> = invoices
        .into_iter()
        .map(|invoice| {
            let matched = invoice
                .payment_intent_id
                .as_deref()
                .and_then(|pi| by_intent.get(pi));
            Booking {
                invoice_id: invoice.id,
                status: invoice.status,
                amount_cents: invoice.amount_cents,
                currency: invoice.currency,
                created: invoice.created,
                hosted_invoice_url: invoice.hosted_invoice_url,
                listing_id: matched.map(|(id, _)| *id),
                listing_title: matched.map(|(_, title)| title.to_string()),
            }
        })
        .collect();

    Ok(Json(DataResponse { data: bookings }))
}
