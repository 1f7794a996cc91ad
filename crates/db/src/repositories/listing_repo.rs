//! Repository for the `listings` table.

use immopilot_core::listing::ListingStatus;
use immopilot_core::types::{DbId, Timestamp, UserId};
use sqlx::PgPool;

use crate::models::listing::{CreateListing, Listing, UpdateListing};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, status_id, transaction_type, usage_type, title, \
                       description, street, house_number, postal_code, city, country, \
                       hide_address, living_area_sqm, plot_area_sqm, rooms, \
                       construction_year, price_cents, currency, package_code, \
                       runtime_days, published_at, expires_at, paid_at, \
                       payment_intent_id, checkout_session_id, \
                       syndication_property_id, syndication_listing_id, \
                       created_at, updated_at";

/// Provides CRUD operations for listings.
pub struct ListingRepo;

impl ListingRepo {
    /// Insert a new listing, returning the created row.
    ///
    /// Defaults applied here: currency `EUR`, country `DE`, price `0`,
    /// runtime 90 days. The caller decides the initial status.
    pub async fn create(
        pool: &PgPool,
        owner_id: UserId,
        status: ListingStatus,
        input: &CreateListing,
    ) -> Result<Listing, sqlx::Error> {
        let query = format!(
            "INSERT INTO listings (owner_id, status_id, transaction_type, usage_type, title, \
             description, street, house_number, postal_code, city, country, hide_address, \
             living_area_sqm, plot_area_sqm, rooms, construction_year, price_cents, currency, \
             package_code, runtime_days)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
             $17, $18, $19, $20)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(owner_id)
            .bind(status.id())
            .bind(&input.transaction_type)
            .bind(&input.usage_type)
            .bind(input.title.trim())
            .bind(&input.description)
            .bind(&input.street)
            .bind(&input.house_number)
            .bind(&input.postal_code)
            .bind(&input.city)
            .bind(input.country.as_deref().unwrap_or("DE"))
            .bind(input.hide_address)
            .bind(input.living_area_sqm)
            .bind(input.plot_area_sqm)
            .bind(input.rooms)
            .bind(input.construction_year)
            .bind(input.price_cents.unwrap_or(0))
            .bind(input.currency.as_deref().unwrap_or("EUR"))
            .bind(&input.package_code)
            .bind(input.runtime_days.unwrap_or(90))
            .fetch_one(pool)
            .await
    }

    /// List an owner's listings, newest first.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM listings
             WHERE owner_id = $1 AND status_id <> $2
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(owner_id)
            .bind(ListingStatus::Deleted.id())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Fetch a listing by id, scoped to its owner.
    pub async fn find_by_id_for_owner(
        pool: &PgPool,
        id: DbId,
        owner_id: UserId,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM listings
             WHERE id = $1 AND owner_id = $2 AND status_id <> $3"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(ListingStatus::Deleted.id())
            .fetch_optional(pool)
            .await
    }

    /// Fetch a listing by id without owner scoping (webhook / worker paths).
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM listings WHERE id = $1");
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Patch attribute/address fields, returning the updated row.
    ///
    /// Absent fields keep their current value (COALESCE). Status changes go
    /// through [`set_status`](Self::set_status) instead.
    pub async fn update_fields(
        pool: &PgPool,
        id: DbId,
        owner_id: UserId,
        input: &UpdateListing,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!(
            "UPDATE listings SET
                 title = COALESCE($3, title),
                 description = COALESCE($4, description),
                 street = COALESCE($5, street),
                 house_number = COALESCE($6, house_number),
                 postal_code = COALESCE($7, postal_code),
                 city = COALESCE($8, city),
                 country = COALESCE($9, country),
                 hide_address = COALESCE($10, hide_address),
                 living_area_sqm = COALESCE($11, living_area_sqm),
                 plot_area_sqm = COALESCE($12, plot_area_sqm),
                 rooms = COALESCE($13, rooms),
                 construction_year = COALESCE($14, construction_year),
                 price_cents = COALESCE($15, price_cents),
                 package_code = COALESCE($16, package_code),
                 runtime_days = COALESCE($17, runtime_days),
                 updated_at = NOW()
             WHERE id = $1 AND owner_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.street)
            .bind(&input.house_number)
            .bind(&input.postal_code)
            .bind(&input.city)
            .bind(&input.country)
            .bind(input.hide_address)
            .bind(input.living_area_sqm)
            .bind(input.plot_area_sqm)
            .bind(input.rooms)
            .bind(input.construction_year)
            .bind(input.price_cents)
            .bind(&input.package_code)
            .bind(input.runtime_days)
            .fetch_optional(pool)
            .await
    }

    /// Set the lifecycle status. Returns `true` if the row was updated.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: ListingStatus,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE listings SET status_id = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(status.id())
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record the checkout session created for a listing, align the runtime
    /// with the booked package and move a draft to `pending_payment`.
    pub async fn set_checkout_session(
        pool: &PgPool,
        id: DbId,
        session_id: &str,
        runtime_days: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE listings SET
                 checkout_session_id = $2,
                 status_id = $3,
                 runtime_days = $4,
                 updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(session_id)
        .bind(ListingStatus::PendingPayment.id())
        .bind(runtime_days)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear a stored checkout session by its vendor id (session expired).
    pub async fn clear_checkout_session(
        pool: &PgPool,
        session_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE listings SET checkout_session_id = NULL, updated_at = NOW()
             WHERE checkout_session_id = $1",
        )
        .bind(session_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a listing as paid: status `pending_sync`, payment intent stored,
    /// `paid_at` set once.
    ///
    /// Written so at-least-once webhook delivery is harmless: `paid_at`
    /// only moves from NULL, and the status filter keeps a duplicate event
    /// from pulling an already-published listing back into the sync queue.
    /// Returns `None` when the row is gone or already past `pending_sync`.
    pub async fn mark_paid(
        pool: &PgPool,
        id: DbId,
        payment_intent_id: &str,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!(
            "UPDATE listings SET
                 status_id = $2,
                 payment_intent_id = $3,
                 paid_at = COALESCE(paid_at, NOW()),
                 updated_at = NOW()
             WHERE id = $1 AND status_id IN ($4, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .bind(ListingStatus::PendingSync.id())
            .bind(payment_intent_id)
            .bind(ListingStatus::PendingPayment.id())
            .fetch_optional(pool)
            .await
    }

    /// Listings waiting to be pushed to the syndication partner.
    pub async fn list_pending_sync(pool: &PgPool, limit: i64) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM listings
             WHERE status_id = $1
             ORDER BY paid_at ASC NULLS LAST
             LIMIT $2"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(ListingStatus::PendingSync.id())
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Record a successful syndication push and activate the listing.
    pub async fn mark_active(
        pool: &PgPool,
        id: DbId,
        property_id: &str,
        listing_id: &str,
        published_at: Timestamp,
        expires_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE listings SET
                 status_id = $2,
                 syndication_property_id = $3,
                 syndication_listing_id = $4,
                 published_at = $5,
                 expires_at = $6,
                 updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(ListingStatus::Active.id())
        .bind(property_id)
        .bind(listing_id)
        .bind(published_at)
        .bind(expires_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Active listings, for the public sitemap.
    pub async fn list_active(pool: &PgPool, limit: i64) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM listings
             WHERE status_id = $1
             ORDER BY published_at DESC NULLS LAST
             LIMIT $2"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(ListingStatus::Active.id())
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Look up the owner's listings keyed by payment intent, for joining
    /// invoice rows to listing titles in the bookings projection.
    pub async fn list_with_payment_intent(
        pool: &PgPool,
        owner_id: UserId,
    ) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM listings
             WHERE owner_id = $1 AND payment_intent_id IS NOT NULL"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Hard-delete a listing. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, owner_id: UserId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete all listings for an owner (account deletion). Returns the count.
    pub async fn delete_all_for_owner(
        pool: &PgPool,
        owner_id: UserId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM listings WHERE owner_id = $1")
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
