//! Listing model and DTOs.

use immopilot_core::listing::{ListingStatus, StatusId};
use immopilot_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A listing row from the `listings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Listing {
    pub id: DbId,
    pub owner_id: UserId,
    pub status_id: StatusId,
    pub transaction_type: String,
    pub usage_type: String,

    pub title: String,
    pub description: Option<String>,

    pub street: Option<String>,
    pub house_number: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country: String,
    pub hide_address: bool,

    pub living_area_sqm: Option<f64>,
    pub plot_area_sqm: Option<f64>,
    pub rooms: Option<f64>,
    pub construction_year: Option<i32>,
    pub price_cents: i64,
    pub currency: String,

    pub package_code: Option<String>,
    pub runtime_days: i32,
    pub published_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub paid_at: Option<Timestamp>,

    pub payment_intent_id: Option<String>,
    pub checkout_session_id: Option<String>,
    pub syndication_property_id: Option<String>,
    pub syndication_listing_id: Option<String>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Listing {
    /// Decode the stored status id.
    ///
    /// The column carries a foreign key into `listing_statuses`, so an
    /// unknown id means seed data and enum drifted apart. Such a row is
    /// logged and treated as archived, which permits neither deletion nor
    /// owner transitions.
    pub fn status(&self) -> ListingStatus {
        match ListingStatus::from_id(self.status_id) {
            Some(status) => status,
            None => {
                tracing::error!(
                    listing_id = self.id,
                    status_id = self.status_id,
                    "Unknown listing status id, treating as archived"
                );
                ListingStatus::Archived
            }
        }
    }
}

/// DTO for creating a new listing.
#[derive(Debug, Deserialize)]
pub struct CreateListing {
    pub transaction_type: String,
    pub usage_type: String,
    pub title: String,
    pub description: Option<String>,

    pub street: Option<String>,
    pub house_number: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    #[serde(default)]
    pub hide_address: bool,

    pub living_area_sqm: Option<f64>,
    pub plot_area_sqm: Option<f64>,
    pub rooms: Option<f64>,
    pub construction_year: Option<i32>,
    pub price_cents: Option<i64>,
    pub currency: Option<String>,

    pub package_code: Option<String>,
    pub runtime_days: Option<i32>,

    /// Optional initial UI status. Only `entwurf` is honored; anything else
    /// (or absence) lands the row in `zahlung_ausstehend`.
    pub ui_status: Option<String>,
}

/// DTO for patching a listing (all fields optional).
#[derive(Debug, Default, Deserialize)]
pub struct UpdateListing {
    pub title: Option<String>,
    pub description: Option<String>,

    pub street: Option<String>,
    pub house_number: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub hide_address: Option<bool>,

    pub living_area_sqm: Option<f64>,
    pub plot_area_sqm: Option<f64>,
    pub rooms: Option<f64>,
    pub construction_year: Option<i32>,
    pub price_cents: Option<i64>,

    pub package_code: Option<String>,
    pub runtime_days: Option<i32>,

    /// Requested manual UI-status change (e.g. `deaktiviert`).
    pub ui_status: Option<String>,
}
