//! HTTP client for the payment processor's REST API.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// HTTP request timeout for a single API call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default API base URL.
const DEFAULT_API_BASE: &str = "https://api.payproc.example/v1";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for payment API failures.
#[derive(Debug, thiserror::Error)]
pub enum PaymentsError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The payment API returned a non-2xx status code.
    #[error("Payment API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Configuration for the payment processor client.
#[derive(Debug, Clone)]
pub struct PaymentsConfig {
    /// API base URL (defaults to the vendor's production endpoint).
    pub api_base: String,
    /// Secret API key, sent as a Bearer token.
    pub secret_key: String,
}

impl PaymentsConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `PAYMENTS_SECRET_KEY` is not set, signalling that
    /// the payment processor is not configured (checkout is disabled).
    ///
    /// | Variable              | Required | Default                |
    /// |-----------------------|----------|------------------------|
    /// | `PAYMENTS_SECRET_KEY` | yes      | --                     |
    /// | `PAYMENTS_API_BASE`   | no       | vendor production URL  |
    pub fn from_env() -> Option<Self> {
        let secret_key = std::env::var("PAYMENTS_SECRET_KEY").ok()?;
        Some(Self {
            api_base: std::env::var("PAYMENTS_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            secret_key,
        })
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// A customer record at the payment processor.
#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// A hosted checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Redirect URL of the hosted payment page.
    pub url: String,
}

/// Parameters for creating a hosted checkout session.
#[derive(Debug, Serialize)]
pub struct CheckoutSessionParams {
    /// `payment` for one-off listing fees.
    pub mode: String,
    pub customer: String,
    pub amount_cents: i64,
    pub currency: String,
    /// Line-item description shown on the hosted page.
    pub description: String,
    pub success_url: String,
    pub cancel_url: String,
    /// Free-form metadata echoed back in webhook events.
    pub metadata: HashMap<String, String>,
}

/// An invoice row from the processor's invoice list.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Invoice {
    pub id: String,
    pub status: String,
    pub amount_cents: i64,
    pub currency: String,
    pub payment_intent_id: Option<String>,
    pub hosted_invoice_url: Option<String>,
    /// Unix timestamp of invoice creation.
    pub created: i64,
}

#[derive(Debug, Deserialize)]
struct InvoiceList {
    data: Vec<Invoice>,
}

#[derive(Debug, Serialize)]
struct CreateCustomerBody<'a> {
    email: Option<&'a str>,
    name: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client for the payment processor's REST API.
pub struct PaymentsClient {
    config: PaymentsConfig,
    client: reqwest::Client,
}

impl PaymentsClient {
    /// Create a new client with a pre-configured HTTP client.
    pub fn new(config: PaymentsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { config, client }
    }

    /// Create a customer record, returning its vendor id.
    pub async fn create_customer(
        &self,
        email: Option<&str>,
        name: Option<&str>,
    ) -> Result<Customer, PaymentsError> {
        let url = format!("{}/customers", self.config.api_base);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.secret_key)
            .json(&CreateCustomerBody { email, name })
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Create a hosted checkout session and return its redirect URL.
    ///
    /// Sends a fresh idempotency key so a retried request cannot open two
    /// sessions for the same click.
    pub async fn create_checkout_session(
        &self,
        params: &CheckoutSessionParams,
    ) -> Result<CheckoutSession, PaymentsError> {
        let url = format!("{}/checkout/sessions", self.config.api_base);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.secret_key)
            .header("idempotency-key", idempotency_key())
            .json(params)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// List invoices for a customer, newest first.
    pub async fn list_invoices(&self, customer_id: &str) -> Result<Vec<Invoice>, PaymentsError> {
        let url = format!("{}/invoices", self.config.api_base);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.secret_key)
            .query(&[("customer", customer_id)])
            .send()
            .await?;
        let list: InvoiceList = Self::decode(response).await?;
        Ok(list.data)
    }

    /// Decode a response body or surface the API error status.
    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, PaymentsError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), %message, "Payment API error");
            return Err(PaymentsError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }
}

/// Generate a random 128-bit hex idempotency key.
fn idempotency_key() -> String {
    use rand::Rng;
    let bytes: [u8; 16] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
