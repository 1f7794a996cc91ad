//! Repository for the `appointments` table.

use immopilot_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::appointment::{Appointment, CreateAppointment, UpdateAppointment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, listing_id, title, notes, starts_at, ends_at, \
                       contact_name, contact_email, created_at, updated_at";

/// Provides CRUD operations for appointments.
pub struct AppointmentRepo;

impl AppointmentRepo {
    /// Insert a new appointment, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: UserId,
        input: &CreateAppointment,
    ) -> Result<Appointment, sqlx::Error> {
        let query = format!(
            "INSERT INTO appointments (owner_id, listing_id, title, notes, starts_at, ends_at, \
             contact_name, contact_email)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(owner_id)
            .bind(input.listing_id)
            .bind(input.title.trim())
            .bind(&input.notes)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(&input.contact_name)
            .bind(&input.contact_email)
            .fetch_one(pool)
            .await
    }

    /// List an owner's appointments, soonest first.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Appointment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM appointments
             WHERE owner_id = $1
             ORDER BY starts_at ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(owner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Fetch an appointment by id, scoped to its owner.
    pub async fn find_by_id_for_owner(
        pool: &PgPool,
        id: DbId,
        owner_id: UserId,
    ) -> Result<Option<Appointment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM appointments WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, Appointment>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Patch an appointment, returning the updated row.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        owner_id: UserId,
        input: &UpdateAppointment,
    ) -> Result<Option<Appointment>, sqlx::Error> {
        let query = format!(
            "UPDATE appointments SET
                 title = COALESCE($3, title),
                 notes = COALESCE($4, notes),
                 starts_at = COALESCE($5, starts_at),
                 ends_at = COALESCE($6, ends_at),
                 contact_name = COALESCE($7, contact_name),
                 contact_email = COALESCE($8, contact_email),
                 updated_at = NOW()
             WHERE id = $1 AND owner_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Appointment>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.notes)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(&input.contact_name)
            .bind(&input.contact_email)
            .fetch_optional(pool)
            .await
    }

    /// Delete an appointment. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, owner_id: UserId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete all appointments for an owner (account deletion). Returns the count.
    pub async fn delete_all_for_owner(
        pool: &PgPool,
        owner_id: UserId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM appointments WHERE owner_id = $1")
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
