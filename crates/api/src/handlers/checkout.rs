//! Handler for starting a hosted checkout session for a listing.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use immopilot_core::error::CoreError;
use immopilot_core::listing::{ListingStatus, Package};
use immopilot_core::types::DbId;
use immopilot_db::repositories::{ListingRepo, ProfileRepo};
use immopilot_payments::CheckoutSessionParams;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for a created checkout session.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    /// Redirect URL of the hosted payment page.
    pub url: String,
    pub session_id: String,
}

/// POST /api/v1/checkout/listings/{id}
///
/// Ensure the caller has a payment customer, then create a hosted checkout
/// session for the listing fee. The listing must still be unpaid (`entwurf`
/// or `zahlung_ausstehend`); a draft is moved to `zahlung_ausstehend` once
/// the session exists.
pub async fn create_listing_checkout(
    user: AuthUser,
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let payments = state.payments.as_ref().ok_or_else(|| {
        AppError::InternalError("Payment processor is not configured".into())
    })?;

    let listing = ListingRepo::find_by_id_for_owner(&state.pool, listing_id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id: listing_id,
        }))?;

    match listing.status() {
        ListingStatus::Draft | ListingStatus::PendingPayment => {}
        other => {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Listing is already paid (status: {})",
                other.ui_status()
            ))));
        }
    }

    // Lazily create the payment customer on the profile.
    let profile = ProfileRepo::ensure(&state.pool, user.user_id, user.email.as_deref()).await?;
    let customer_id = match profile.payment_customer_id {
        Some(id) => id,
        None => {
            let name = match (&profile.first_name, &profile.last_name) {
                (Some(first), Some(last)) => Some(format!("{first} {last}")),
                _ => None,
            };
            let customer = payments
                .create_customer(profile.email.as_deref(), name.as_deref())
                .await
                .map_err(|e| AppError::InternalError(format!("Customer creation failed: {e}")))?;
            ProfileRepo::set_payment_customer(&state.pool, user.user_id, &customer.id).await?;
            tracing::info!(user_id = %user.user_id, customer_id = %customer.id, "Payment customer created");
            customer.id
        }
    };

    let package = listing
        .package_code
        .as_deref()
        .and_then(Package::parse)
        .unwrap_or_default();

    let mut metadata = HashMap::new();
    metadata.insert("kind".to_string(), "listing".to_string());
    metadata.insert("listing_id".to_string(), listing.id.to_string());

    let session = payments
        .create_checkout_session(&CheckoutSessionParams {
            mode: "payment".to_string(),
            customer: customer_id,
            amount_cents: package.price_cents(),
            currency: listing.currency.clone(),
            description: format!("Anzeigenpaket {}: {}", package.code(), listing.title),
            success_url: state.config.checkout_success_url.clone(),
            cancel_url: state.config.checkout_cancel_url.clone(),
            metadata,
        })
        .await
        .map_err(|e| AppError::InternalError(format!("Checkout session creation failed: {e}")))?;

    ListingRepo::set_checkout_session(&state.pool, listing.id, &session.id, package.runtime_days())
        .await?;

    tracing::info!(
        listing_id = listing.id,
        user_id = %user.user_id,
        session_id = %session.id,
        package = package.code(),
        "Checkout session created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CheckoutResponse {
                url: session.url,
                session_id: session.id,
            },
        }),
    ))
}
