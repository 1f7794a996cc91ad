//! Receiver for the payment processor's signed webhooks.
//!
//! The signature is verified against the raw request bytes before any JSON
//! parsing. Event handling is table-driven: each known event type patches
//! one or two rows with absolute values, so the processor's at-least-once
//! delivery can re-apply an event without harm.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use immopilot_db::repositories::{ListingRepo, ProfileRepo};
use immopilot_mail::templates;
use immopilot_payments::webhook::{
    verify_signature, CheckoutSessionObject, CustomerObject, WebhookEvent,
    DEFAULT_TOLERANCE_SECS,
};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Header carrying the processor's `t=,v1=` signature.
const SIGNATURE_HEADER: &str = "x-payment-signature";

/// POST /api/v1/webhooks/payments
///
/// Public endpoint; authenticity comes from the signature, not a session.
pub async fn receive_payment_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Missing signature header".into()))?;

    verify_signature(
        &body,
        signature,
        &state.config.payment_webhook_secret,
        DEFAULT_TOLERANCE_SECS,
        chrono::Utc::now().timestamp(),
    )
    .map_err(|e| {
        tracing::warn!(error = %e, "Webhook signature rejected");
        AppError::BadRequest(format!("Invalid signature: {e}"))
    })?;

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid event payload: {e}")))?;

    tracing::info!(event_id = %event.id, event_type = %event.event_type, "Payment webhook received");

    match event.event_type.as_str() {
        "checkout.session.completed" => handle_session_completed(&state, event).await?,
        "checkout.session.expired" => handle_session_expired(&state, event).await?,
        "customer.deleted" => handle_customer_deleted(&state, event).await?,
        other => {
            // Acknowledge everything else so the processor stops retrying.
            tracing::debug!(event_type = other, "Ignoring unhandled payment event");
        }
    }

    Ok(Json(json!({ "received": true })))
}

/// A completed checkout in payment mode with listing metadata marks the
/// referenced listing as paid and queues it for syndication.
async fn handle_session_completed(state: &AppState, event: WebhookEvent) -> AppResult<()> {
    let session: CheckoutSessionObject = serde_json::from_value(event.data.object)
        .map_err(|e| AppError::BadRequest(format!("Invalid session object: {e}")))?;

    if session.mode != "payment" {
        tracing::debug!(session_id = %session.id, mode = %session.mode, "Ignoring non-payment session");
        return Ok(());
    }
    if session.metadata.get("kind").map(String::as_str) != Some("listing") {
        tracing::debug!(session_id = %session.id, "Ignoring session without listing metadata");
        return Ok(());
    }

    let listing_id: i64 = session
        .metadata
        .get("listing_id")
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| AppError::BadRequest("Missing or invalid listing_id metadata".into()))?;

    let payment_intent = session.payment_intent.as_deref().unwrap_or_default();

    let Some(listing) = ListingRepo::mark_paid(&state.pool, listing_id, payment_intent).await?
    else {
        // Either the listing was removed between checkout and webhook, or a
        // duplicate event arrived after the sync worker published it.
        tracing::warn!(listing_id, "Paid listing missing or already published, ignoring");
        return Ok(());
    };

    tracing::info!(
        listing_id,
        session_id = %session.id,
        "Listing paid, queued for syndication",
    );

    if let Some(mailer) = &state.mailer {
        if let Some(email) =
            ProfileRepo::find_by_user(&state.pool, listing.owner_id).await?.and_then(|p| p.email)
        {
            let mail = templates::payment_confirmation(&listing.title, listing.runtime_days);
            let mailer = mailer.clone();
            // Fire and forget; mail failure must not fail the webhook ack.
            tokio::spawn(async move {
                if let Err(e) = mailer.send(&email, &mail.subject, &mail.body).await {
                    tracing::error!(error = %e, "Payment confirmation mail failed");
                }
            });
        }
    }

    Ok(())
}

/// An expired session clears the stored session id so the owner can start a
/// fresh checkout.
async fn handle_session_expired(state: &AppState, event: WebhookEvent) -> AppResult<()> {
    let session: CheckoutSessionObject = serde_json::from_value(event.data.object)
        .map_err(|e| AppError::BadRequest(format!("Invalid session object: {e}")))?;

    let cleared = ListingRepo::clear_checkout_session(&state.pool, &session.id).await?;
    tracing::info!(session_id = %session.id, cleared, "Checkout session expired");
    Ok(())
}

/// A customer deleted at the vendor is detached from its profile.
async fn handle_customer_deleted(state: &AppState, event: WebhookEvent) -> AppResult<()> {
    let customer: CustomerObject = serde_json::from_value(event.data.object)
        .map_err(|e| AppError::BadRequest(format!("Invalid customer object: {e}")))?;

    let cleared = ProfileRepo::clear_payment_customer(&state.pool, &customer.id).await?;
    tracing::info!(customer_id = %customer.id, cleared, "Payment customer detached");
    Ok(())
}
