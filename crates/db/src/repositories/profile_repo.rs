//! Repository for the `profiles` table.

use immopilot_core::types::UserId;
use sqlx::PgPool;

use crate::models::profile::{Profile, UpdateProfile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, email, first_name, last_name, company, street, \
                       house_number, postal_code, city, country, phone, vat_number, \
                       payment_customer_id, created_at, updated_at";

/// Provides CRUD operations for user profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Fetch a profile by its auth user id.
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE user_id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert an empty profile for a user, or return the existing row.
    ///
    /// Backs the lazy-creation semantics of `GET /profile`: safe to call on
    /// every first-login race, the unique constraint on `user_id` plus
    /// `ON CONFLICT` makes it a no-op upsert.
    pub async fn ensure(
        pool: &PgPool,
        user_id: UserId,
        email: Option<&str>,
    ) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (user_id, email)
             VALUES ($1, $2)
             ON CONFLICT (user_id) DO UPDATE SET updated_at = profiles.updated_at
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(email)
            .fetch_one(pool)
            .await
    }

    /// Patch contact/billing fields, returning the updated row.
    pub async fn update(
        pool: &PgPool,
        user_id: UserId,
        input: &UpdateProfile,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET
                 email = COALESCE($2, email),
                 first_name = COALESCE($3, first_name),
                 last_name = COALESCE($4, last_name),
                 company = COALESCE($5, company),
                 street = COALESCE($6, street),
                 house_number = COALESCE($7, house_number),
                 postal_code = COALESCE($8, postal_code),
                 city = COALESCE($9, city),
                 country = COALESCE($10, country),
                 phone = COALESCE($11, phone),
                 vat_number = COALESCE($12, vat_number),
                 updated_at = NOW()
             WHERE user_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.company)
            .bind(&input.street)
            .bind(&input.house_number)
            .bind(&input.postal_code)
            .bind(&input.city)
            .bind(&input.country)
            .bind(&input.phone)
            .bind(&input.vat_number)
            .fetch_optional(pool)
            .await
    }

    /// Store the payment processor's customer id for a user.
    pub async fn set_payment_customer(
        pool: &PgPool,
        user_id: UserId,
        customer_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE profiles SET payment_customer_id = $2, updated_at = NOW()
             WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(customer_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear the stored customer id wherever it matches (customer deleted at
    /// the vendor). Returns `true` if any row was updated.
    pub async fn clear_payment_customer(
        pool: &PgPool,
        customer_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE profiles SET payment_customer_id = NULL, updated_at = NOW()
             WHERE payment_customer_id = $1",
        )
        .bind(customer_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a user's profile row. Returns `true` if a row was removed.
    pub async fn delete_for_user(pool: &PgPool, user_id: UserId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
