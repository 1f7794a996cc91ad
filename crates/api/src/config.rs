use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development except
/// the secrets, which must be set explicitly.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Public base URL of the web frontend, used for sitemap entries and
    /// checkout redirect URLs.
    pub public_base_url: String,
    /// Directory of static marketing/legal pages served under `/`.
    pub public_dir: String,
    /// URL the payment processor redirects to after a successful checkout.
    pub checkout_success_url: String,
    /// URL the payment processor redirects to after an aborted checkout.
    pub checkout_cancel_url: String,
    /// Signing secret for incoming payment webhooks.
    pub payment_webhook_secret: String,
    /// Hosted-auth token configuration (shared HS256 secret).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                           |
    /// |----------------------------|-----------------------------------|
    /// | `HOST`                     | `0.0.0.0`                         |
    /// | `PORT`                     | `3000`                            |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`           |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                              |
    /// | `PUBLIC_BASE_URL`          | `http://localhost:5173`           |
    /// | `PUBLIC_DIR`               | `public`                          |
    /// | `CHECKOUT_SUCCESS_URL`     | `{PUBLIC_BASE_URL}/konto/anzeigen?checkout=success` |
    /// | `CHECKOUT_CANCEL_URL`      | `{PUBLIC_BASE_URL}/konto/anzeigen?checkout=cancel`  |
    /// | `PAYMENTS_WEBHOOK_SECRET`  | **required**                      |
    ///
    /// # Panics
    ///
    /// Panics if `PAYMENTS_WEBHOOK_SECRET` is not set; an unverifiable
    /// webhook endpoint must not come up.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5173".into());

        let public_dir = std::env::var("PUBLIC_DIR").unwrap_or_else(|_| "public".into());

        let checkout_success_url = std::env::var("CHECKOUT_SUCCESS_URL").unwrap_or_else(|_| {
            format!("{public_base_url}/konto/anzeigen?checkout=success")
        });
        let checkout_cancel_url = std::env::var("CHECKOUT_CANCEL_URL")
            .unwrap_or_else(|_| format!("{public_base_url}/konto/anzeigen?checkout=cancel"));

        let payment_webhook_secret = std::env::var("PAYMENTS_WEBHOOK_SECRET")
            .expect("PAYMENTS_WEBHOOK_SECRET must be set in the environment");
        assert!(
            !payment_webhook_secret.is_empty(),
            "PAYMENTS_WEBHOOK_SECRET must not be empty"
        );

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            public_base_url,
            public_dir,
            checkout_success_url,
            checkout_cancel_url,
            payment_webhook_secret,
            jwt,
        }
    }
}
