//! Handlers for the `/appointments` resource.
//!
//! Owner-scoped calendar entries referencing one of the owner's listings.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use immopilot_core::error::CoreError;
use immopilot_core::types::DbId;
use immopilot_db::models::appointment::{CreateAppointment, UpdateAppointment};
use immopilot_db::repositories::{clamp_limit, clamp_offset, AppointmentRepo, ListingRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/appointments
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, 50, 200);
    let offset = clamp_offset(params.offset);

    let appointments =
        AppointmentRepo::list_for_owner(&state.pool, user.user_id, limit, offset).await?;

    Ok(Json(DataResponse { data: appointments }))
}

/// POST /api/v1/appointments
///
/// The referenced listing must belong to the caller.
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateAppointment>,
) -> AppResult<impl IntoResponse> {
    if input.title.trim().is_empty() {
        return Err(AppError::BadRequest("title must not be empty".into()));
    }
    if input.ends_at.is_some_and(|end| end <= input.starts_at) {
        return Err(AppError::BadRequest("ends_at must be after starts_at".into()));
    }

    ListingRepo::find_by_id_for_owner(&state.pool, input.listing_id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id: input.listing_id,
        }))?;

    let appointment = AppointmentRepo::create(&state.pool, user.user_id, &input).await?;

    tracing::info!(
        appointment_id = appointment.id,
        listing_id = appointment.listing_id,
        user_id = %user.user_id,
        "Appointment created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: appointment })))
}

/// PUT /api/v1/appointments/{id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(appointment_id): Path<DbId>,
    Json(input): Json<UpdateAppointment>,
) -> AppResult<impl IntoResponse> {
    if input.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::BadRequest("title must not be empty".into()));
    }

    let updated = AppointmentRepo::update(&state.pool, appointment_id, user.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Appointment",
            id: appointment_id,
        }))?;

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/appointments/{id}
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(appointment_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = AppointmentRepo::delete(&state.pool, appointment_id, user.user_id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Appointment",
            id: appointment_id,
        }));
    }

    tracing::info!(appointment_id, user_id = %user.user_id, "Appointment deleted");

    Ok(StatusCode::NO_CONTENT)
}
