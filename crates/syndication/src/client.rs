//! HTTP client wrapping the syndication vendor's REST API.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// HTTP request timeout for a single API call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Default API base URL.
const DEFAULT_API_BASE: &str = "https://api.portalsync.example/v1";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for syndication API failures.
#[derive(Debug, thiserror::Error)]
pub enum SyndicationError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The syndication API returned a non-2xx status code.
    #[error("Syndication API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Configuration for the syndication client.
#[derive(Debug, Clone)]
pub struct SyndicationConfig {
    /// API base URL.
    pub api_base: String,
    /// Partner API key, sent as a Bearer token.
    pub api_key: String,
    /// Agency account id all properties are created under.
    pub account_id: String,
    /// Portal target codes to activate for each published listing.
    pub target_codes: Vec<String>,
}

impl SyndicationConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SYNDICATION_API_KEY` is not set, signalling that
    /// syndication is not configured (paid listings stay `pending_sync`).
    ///
    /// | Variable                | Required | Default                |
    /// |-------------------------|----------|------------------------|
    /// | `SYNDICATION_API_KEY`   | yes      | --                     |
    /// | `SYNDICATION_ACCOUNT_ID`| yes      | --                     |
    /// | `SYNDICATION_API_BASE`  | no       | vendor production URL  |
    /// | `SYNDICATION_TARGETS`   | no       | `is24` (comma-separated) |
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("SYNDICATION_API_KEY").ok()?;
        let account_id = std::env::var("SYNDICATION_ACCOUNT_ID").ok()?;
        let target_codes = std::env::var("SYNDICATION_TARGETS")
            .unwrap_or_else(|_| "is24".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Some(Self {
            api_base: std::env::var("SYNDICATION_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            api_key,
            account_id,
            target_codes,
        })
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// The agency account at the syndication partner.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub active: bool,
}

/// A property record (the physical object) at the partner.
#[derive(Debug, Clone, Deserialize)]
pub struct Property {
    pub id: String,
}

/// Property payload sent when creating or updating a property.
#[derive(Debug, Serialize)]
pub struct PropertyInput {
    pub external_ref: String,
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
}

/// A publication of a property at the partner.
#[derive(Debug, Clone, Deserialize)]
pub struct PortalListing {
    pub id: String,
    pub status: String,
}

/// Publication payload: runtime and target portals.
#[derive(Debug, Serialize)]
pub struct PublishInput {
    pub runtime_days: i32,
}

/// A portal target attached to a listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Target {
    pub code: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
struct ActivateTargetsBody<'a> {
    targets: &'a [String],
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client for the syndication partner's REST API.
pub struct SyndicationClient {
    config: SyndicationConfig,
    client: reqwest::Client,
}

impl SyndicationClient {
    /// Create a new client with a pre-configured HTTP client.
    pub fn new(config: SyndicationConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { config, client }
    }

    /// Portal target codes configured for this deployment.
    pub fn target_codes(&self) -> &[String] {
        &self.config.target_codes
    }

    /// Fetch the agency account.
    pub async fn get_account(&self) -> Result<Account, SyndicationError> {
        let url = format!(
            "{}/accounts/{}",
            self.config.api_base, self.config.account_id
        );
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Create a property under the agency account.
    pub async fn create_property(
        &self,
        input: &PropertyInput,
    ) -> Result<Property, SyndicationError> {
        let url = format!(
            "{}/accounts/{}/properties",
            self.config.api_base, self.config.account_id
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(input)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Update an existing property.
    pub async fn update_property(
        &self,
        property_id: &str,
        input: &PropertyInput,
    ) -> Result<Property, SyndicationError> {
        let url = format!("{}/properties/{property_id}", self.config.api_base);
        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.config.api_key)
            .json(input)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Create a listing (publication) for a property.
    pub async fn create_listing(
        &self,
        property_id: &str,
        input: &PublishInput,
    ) -> Result<PortalListing, SyndicationError> {
        let url = format!(
            "{}/properties/{property_id}/listings",
            self.config.api_base
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(input)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Activate portal targets for a listing.
    pub async fn activate_targets(
        &self,
        listing_id: &str,
        targets: &[String],
    ) -> Result<Vec<Target>, SyndicationError> {
        let url = format!("{}/listings/{listing_id}/targets", self.config.api_base);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&ActivateTargetsBody { targets })
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Deactivate a listing on all portals.
    pub async fn deactivate_listing(&self, listing_id: &str) -> Result<(), SyndicationError> {
        let url = format!("{}/listings/{listing_id}", self.config.api_base);
        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SyndicationError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    /// Decode a response body or surface the API error status.
    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, SyndicationError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), %message, "Syndication API error");
            return Err(SyndicationError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
