//! Handler for account deletion.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use immopilot_db::repositories::{AppointmentRepo, ListingRepo, ProfileRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// DELETE /api/v1/account
///
/// Remove everything this backend stores for the caller: appointments,
/// listings, then the profile row. The hosted auth user itself is deleted by
/// the auth vendor's own flow.
///
/// Best-effort cascade: a failure mid-way is surfaced as 500 and logged, but
/// rows already deleted stay deleted. There is no cross-table invariant that
/// would require compensation here.
pub async fn delete_account(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let appointments = AppointmentRepo::delete_all_for_owner(&state.pool, user.user_id)
        .await
        .inspect_err(|e| {
            tracing::error!(user_id = %user.user_id, error = %e, "Account deletion: appointments failed");
        })?;

    let listings = ListingRepo::delete_all_for_owner(&state.pool, user.user_id)
        .await
        .inspect_err(|e| {
            tracing::error!(user_id = %user.user_id, error = %e, "Account deletion: listings failed");
        })?;

    let profile_deleted = ProfileRepo::delete_for_user(&state.pool, user.user_id)
        .await
        .inspect_err(|e| {
            tracing::error!(user_id = %user.user_id, error = %e, "Account deletion: profile failed");
        })?;

    tracing::info!(
        user_id = %user.user_id,
        appointments,
        listings,
        profile_deleted,
        "Account data deleted",
    );

    Ok(StatusCode::NO_CONTENT)
}
