use std::sync::Arc;

use immopilot_mail::Mailer;
use immopilot_payments::PaymentsClient;
use immopilot_syndication::SyndicationClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
/// The vendor clients are `None` when the corresponding service is not
/// configured; handlers degrade per endpoint (checkout errors, bookings come
/// back empty, mail is skipped).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: immopilot_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Payment processor client.
    pub payments: Option<Arc<PaymentsClient>>,
    /// Partner syndication client.
    pub syndication: Option<Arc<SyndicationClient>>,
    /// Transactional mailer.
    pub mailer: Option<Arc<Mailer>>,
}
