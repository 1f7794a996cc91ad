//! Appointment model and DTOs.

use immopilot_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An appointment row from the `appointments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Appointment {
    pub id: DbId,
    pub owner_id: UserId,
    pub listing_id: DbId,
    pub title: String,
    pub notes: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Option<Timestamp>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new appointment.
#[derive(Debug, Deserialize)]
pub struct CreateAppointment {
    pub listing_id: DbId,
    pub title: String,
    pub notes: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Option<Timestamp>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
}

/// DTO for patching an appointment (all fields optional).
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAppointment {
    pub title: Option<String>,
    pub notes: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
}
