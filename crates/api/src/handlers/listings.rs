//! Handlers for the `/listings` resource.
//!
//! Listings move through a payment-gated lifecycle; the handlers here cover
//! the owner-facing CRUD surface. Status changes triggered by money (webhook)
//! or syndication (background worker) live elsewhere.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use immopilot_core::error::CoreError;
use immopilot_core::listing::{ListingStatus, Package, TransactionType, UsageType};
use immopilot_core::types::DbId;
use immopilot_db::models::listing::{CreateListing, Listing, UpdateListing};
use immopilot_db::repositories::{clamp_limit, clamp_offset, ListingRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// A listing as returned to the web UI: the row plus its UI status slug.
#[derive(Debug, Serialize)]
pub struct ListingView {
    #[serde(flatten)]
    pub listing: Listing,
    pub ui_status: &'static str,
}

impl From<Listing> for ListingView {
    fn from(listing: Listing) -> Self {
        let ui_status = listing.status().ui_status();
        Self { listing, ui_status }
    }
}

/// GET /api/v1/listings
///
/// List the caller's listings, newest first.
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, 50, 200);
    let offset = clamp_offset(params.offset);

    let listings = ListingRepo::list_for_owner(&state.pool, user.user_id, limit, offset).await?;
    let views: Vec<ListingView> = listings.into_iter().map(ListingView::from).collect();

    Ok(Json(DataResponse { data: views }))
}

/// POST /api/v1/listings
///
/// Create a listing. Unless explicitly created as `entwurf`, new rows start
/// in `zahlung_ausstehend`; currency defaults to EUR.
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateListing>,
) -> AppResult<impl IntoResponse> {
    if input.title.trim().is_empty() {
        return Err(AppError::BadRequest("title must not be empty".into()));
    }
    if TransactionType::parse(&input.transaction_type).is_none() {
        return Err(AppError::BadRequest(format!(
            "Unknown transaction_type: {}",
            input.transaction_type
        )));
    }
    if UsageType::parse(&input.usage_type).is_none() {
        return Err(AppError::BadRequest(format!(
            "Unknown usage_type: {}",
            input.usage_type
        )));
    }
    if input.price_cents.is_some_and(|p| p < 0) {
        return Err(AppError::BadRequest("price_cents must not be negative".into()));
    }
    if let Some(code) = input.package_code.as_deref() {
        if Package::parse(code).is_none() {
            return Err(AppError::BadRequest(format!("Unknown package_code: {code}")));
        }
    }

    let status = match input.ui_status.as_deref() {
        Some("entwurf") => ListingStatus::Draft,
        _ => ListingStatus::PendingPayment,
    };

    let listing = ListingRepo::create(&state.pool, user.user_id, status, &input).await?;

    tracing::info!(
        listing_id = listing.id,
        user_id = %user.user_id,
        status = listing.status().ui_status(),
        "Listing created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ListingView::from(listing),
        }),
    ))
}

/// GET /api/v1/listings/{id}
pub async fn get_by_id(
    user: AuthUser,
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let listing = ListingRepo::find_by_id_for_owner(&state.pool, listing_id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id: listing_id,
        }))?;

    Ok(Json(DataResponse {
        data: ListingView::from(listing),
    }))
}

/// PUT /api/v1/listings/{id}
///
/// Patch attribute/address fields. A `ui_status` in the body requests a
/// manual status move, which is only honored for owner-legal transitions.
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
    Json(input): Json<UpdateListing>,
) -> AppResult<impl IntoResponse> {
    let listing = ListingRepo::find_by_id_for_owner(&state.pool, listing_id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id: listing_id,
        }))?;

    if input.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::BadRequest("title must not be empty".into()));
    }
    if input.price_cents.is_some_and(|p| p < 0) {
        return Err(AppError::BadRequest("price_cents must not be negative".into()));
    }

    if let Some(slug) = input.ui_status.as_deref() {
        let target = ListingStatus::from_ui_status(slug)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown ui_status: {slug}")))?;

        let current = listing.status();
        if target != current {
            if !current.owner_may_transition(target) {
                return Err(AppError::Core(CoreError::Conflict(format!(
                    "Cannot move listing from {} to {slug}",
                    current.ui_status()
                ))));
            }
            // Reactivation needs a fresh portal push: the deactivation call
            // below removed the portal listing, so route the row back through
            // the sync worker instead of claiming it is live.
            let stored = if current == ListingStatus::Deactivated
                && target == ListingStatus::Active
                && listing.syndication_property_id.is_some()
            {
                ListingStatus::PendingSync
            } else {
                target
            };

            ListingRepo::set_status(&state.pool, listing_id, stored).await?;
            tracing::info!(
                listing_id,
                user_id = %user.user_id,
                from = current.ui_status(),
                to = stored.ui_status(),
                "Listing status changed",
            );

            // Take a deactivated listing off the portals as well. Fire and
            // forget; the portal copy going stale must not fail the request.
            if target == ListingStatus::Deactivated {
                if let (Some(client), Some(portal_id)) = (
                    state.syndication.clone(),
                    listing.syndication_listing_id.clone(),
                ) {
                    tokio::spawn(async move {
                        if let Err(e) = client.deactivate_listing(&portal_id).await {
                            tracing::error!(listing_id, error = %e, "Portal deactivation failed");
                        }
                    });
                }
            }
        }
    }

    let updated = ListingRepo::update_fields(&state.pool, listing_id, user.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id: listing_id,
        }))?;

    Ok(Json(DataResponse {
        data: ListingView::from(updated),
    }))
}

/// DELETE /api/v1/listings/{id}
///
/// Hard-delete a listing. Only `entwurf` rows may go; once a row reached
/// `zahlung_ausstehend` a checkout session may still complete against it.
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let listing = ListingRepo::find_by_id_for_owner(&state.pool, listing_id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id: listing_id,
        }))?;

    if !listing.status().is_deletable() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Only entwurf listings can be deleted (current status: {})",
            listing.status().ui_status()
        ))));
    }

    ListingRepo::delete(&state.pool, listing_id, user.user_id).await?;

    tracing::info!(listing_id, user_id = %user.user_id, "Listing deleted");

    Ok(StatusCode::NO_CONTENT)
}
