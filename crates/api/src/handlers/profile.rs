//! Handlers for the `/profile` resource.
//!
//! One profile row per authenticated user, lazily created on first read so
//! the frontend never has to special-case a missing profile.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use immopilot_db::models::profile::UpdateProfile;
use immopilot_db::repositories::ProfileRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/profile
///
/// Returns the caller's profile, creating an empty row on first call.
pub async fn get(user: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let profile = ProfileRepo::ensure(&state.pool, user.user_id, user.email.as_deref()).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// PUT /api/v1/profile
///
/// Patch contact/billing fields. Ensures the row exists first so a PUT
/// straight after signup works.
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfile>,
) -> AppResult<impl IntoResponse> {
    ProfileRepo::ensure(&state.pool, user.user_id, user.email.as_deref()).await?;

    let updated = ProfileRepo::update(&state.pool, user.user_id, &input)
        .await?
        .ok_or_else(|| {
            crate::error::AppError::InternalError("Profile vanished during update".into())
        })?;

    tracing::info!(user_id = %user.user_id, "Profile updated");

    Ok(Json(DataResponse { data: updated }))
}
