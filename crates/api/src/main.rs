use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use immopilot_api::config::ServerConfig;
use immopilot_api::router::build_app_router;
use immopilot_api::{background, state};
use immopilot_mail::{MailConfig, Mailer};
use immopilot_payments::{PaymentsClient, PaymentsConfig};
use immopilot_syndication::{SyndicationClient, SyndicationConfig};

use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "immopilot_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = immopilot_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    immopilot_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    immopilot_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Vendor integrations (each optional, gated on env) ---
    let payments = PaymentsConfig::from_env().map(|c| Arc::new(PaymentsClient::new(c)));
    if payments.is_none() {
        tracing::warn!("PAYMENTS_SECRET_KEY not set; checkout and bookings are disabled");
    }

    let syndication = SyndicationConfig::from_env().map(|c| Arc::new(SyndicationClient::new(c)));
    if syndication.is_none() {
        tracing::warn!("Syndication credentials not set; paid listings will not be published");
    }

    let mailer = MailConfig::from_env().map(|c| Arc::new(Mailer::new(c)));
    if mailer.is_none() {
        tracing::warn!("SMTP_HOST not set; transactional email is disabled");
    }

    // --- App state ---
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        payments,
        syndication: syndication.clone(),
        mailer: mailer.clone(),
    };

    // --- Background syndication worker ---
    let sync_cancel = tokio_util::sync::CancellationToken::new();
    let sync_handle = syndication.map(|client| {
        let cancel = sync_cancel.clone();
        tokio::spawn(background::syndication_sync::run(
            pool, client, mailer, cancel,
        ))
    });

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    sync_cancel.cancel();
    if let Some(handle) = sync_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        tracing::info!("Syndication sync job stopped");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
