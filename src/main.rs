//! Invoicer - API server binary
//!
//! # Environment Variables
//!
//! Nested keys use the `INVOICER__` prefix, for example:
//!
//! * `INVOICER__SERVER__PORT` - listen port (default: 8080)
//! * `INVOICER__DATABASE__URL` - PostgreSQL URL; unset runs on the in-memory store
//! * `INVOICER__EMAIL__RESEND_API_KEY` - enables customer emails
//! * `INVOICER__CRON__SECRET` - key for `/internal/cron/invoices`

use std::sync::Arc;

use secrecy::SecretString;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use invoicer::adapters::email::{LoggingNotificationSender, ResendNotificationSender};
use invoicer::adapters::http::{app_router, AppState, HttpSettings};
use invoicer::adapters::memory::{
    InMemoryCredentialStore, InMemoryInvoiceRepository, InMemoryPaymentEventLog,
};
use invoicer::adapters::midtrans::{SnapClient, SnapConfig};
use invoicer::adapters::postgres::{
    connect_pool, run_migrations, PostgresCredentialStore, PostgresInvoiceRepository,
    PostgresPaymentEventLog,
};
use invoicer::config::{AppConfig, LogFormat};
use invoicer::ports::{
    GatewayCredentialStore, InvoiceRepository, NotificationSender, PaymentEventLog,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server.log_level, config.server.log_format);
    config.validate()?;

    let addr = config.server.socket_addr()?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        "Starting invoicer"
    );

    let (invoices, credentials, event_log) = build_storage(&config).await?;

    let notifier: Arc<dyn NotificationSender> = if config.email.is_enabled() {
        Arc::new(ResendNotificationSender::new(&config.email))
    } else {
        tracing::warn!("No email API key configured, customer emails will only be logged");
        Arc::new(LoggingNotificationSender)
    };

    let state = AppState {
        invoices,
        credentials,
        gateway: Arc::new(SnapClient::new(SnapConfig::from(&config.payment))),
        notifier,
        event_log,
        settings: HttpSettings {
            cron_secret: SecretString::new(config.cron.secret.clone()),
            reminder_days_ahead: config.cron.reminder_days_ahead,
            notification_timeout: config.email.send_timeout(),
        },
    };

    let app = app_router(
        state,
        std::time::Duration::from_secs(config.server.request_timeout_secs),
    );

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

type Storage = (
    Arc<dyn InvoiceRepository>,
    Arc<dyn GatewayCredentialStore>,
    Arc<dyn PaymentEventLog>,
);

async fn build_storage(config: &AppConfig) -> Result<Storage, Box<dyn std::error::Error>> {
    if !config.database.is_configured() {
        tracing::warn!("No database URL configured, using the in-memory store");
        return Ok((
            Arc::new(InMemoryInvoiceRepository::new()),
            Arc::new(InMemoryCredentialStore::new()),
            Arc::new(InMemoryPaymentEventLog::new()),
        ));
    }

    tracing::info!("Connecting to database...");
    let pool = connect_pool(&config.database).await?;
    if config.database.run_migrations {
        run_migrations(&pool).await?;
    } else {
        tracing::info!("Skipping migrations, run_migrations is disabled");
    }
    tracing::info!("Database ready");

    Ok((
        Arc::new(PostgresInvoiceRepository::new(pool.clone())),
        Arc::new(PostgresCredentialStore::new(pool.clone())),
        Arc::new(PostgresPaymentEventLog::new(pool)),
    ))
}

fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
    }
}

/// Resolves on Ctrl+C or SIGTERM so in-flight requests can finish.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
