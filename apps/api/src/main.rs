//! # Shelf API Server
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shelf API Server                                 │
//! │                                                                         │
//! │  client ───► HTTP (8080) ───► handlers ───► services ───► SQLite       │
//! │                                                 │                       │
//! │                                                 ▼                       │
//! │                                           SMTP (optional)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use shelf_api::auth::JwtManager;
use shelf_api::notification::{Notifier, SmtpNotifier};
use shelf_api::{router, ApiConfig, AppState};
use shelf_db::migrations::migration_status;
use shelf_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is fine
    dotenvy::dotenv().ok();

    init_tracing();

    info!("Starting Shelf API server...");

    let config = ApiConfig::load().context("Failed to load configuration")?;
    info!(
        addr = %config.listen_addr(),
        db_path = %config.database_path.display(),
        email_notifications = config.email_notifications,
        "Configuration loaded"
    );

    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let db = Database::new(
        DbConfig::new(config.database_path.clone()).max_connections(config.db_max_connections),
    )
    .await
    .context("Failed to open database")?;

    let status = migration_status(db.pool()).await?;
    if !status.is_current() {
        warn!(embedded = status.embedded, applied = status.applied, "Schema behind binary");
    }

    let stats = db.stats().await?;
    info!(
        migrations = status.applied,
        books = stats.books,
        orders = stats.orders,
        items = stats.items,
        "Database ready"
    );

    let notifier: Option<Arc<dyn Notifier>> = match &config.smtp {
        Some(smtp) => {
            let notifier = SmtpNotifier::new(smtp).context("Failed to configure SMTP")?;
            info!(host = %smtp.host, port = smtp.port, "Email notifications enabled");
            Some(Arc::new(notifier))
        }
        None => None,
    };

    let jwt = Arc::new(JwtManager::new(
        config.jwt_secret.clone(),
        config.jwt_lifetime_secs,
    ));
    let state = Arc::new(AppState::new(db.clone(), jwt, notifier));
    let app = router(state);

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    info!(%addr, "Starting HTTP server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// `RUST_LOG` overrides the default `info,sqlx=warn`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
