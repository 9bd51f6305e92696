use std::sync::Arc;

use account_service::config::Config;
use account_service::config::StorageBackend;
use account_service::inbound::http::router::create_router;
use account_service::inbound::http::router::AppState;
use account_service::repositories::database::connect_postgres;
use account_service::repositories::database::connect_sqlite;
use account_service::repositories::PostgresProductRepository;
use account_service::repositories::PostgresUserRepository;
use account_service::repositories::SqliteProductRepository;
use account_service::repositories::SqliteUserRepository;
use auth::PasswordHasher;
use auth::TokenIssuer;
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,auth=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        backend = ?config.database.backend,
        http_port = config.server.http_port,
        request_timeout_secs = config.server.request_timeout_secs,
        token_lifetime_minutes = config.jwt.expiration_minutes,
        "Configuration loaded"
    );

    let password_hasher = Arc::new(PasswordHasher::new());
    let token_issuer = Arc::new(TokenIssuer::new(config.jwt.secret.as_bytes()));
    let token_lifetime = chrono::Duration::minutes(config.jwt.expiration_minutes);

    let state = match config.database.backend {
        StorageBackend::Postgres => {
            let pool =
                connect_postgres(&config.database.url, config.database.max_connections).await?;
            AppState::new(
                Arc::new(PostgresUserRepository::new(pool.clone())),
                Arc::new(PostgresProductRepository::new(pool)),
                password_hasher,
                token_issuer,
                token_lifetime,
            )
        }
        StorageBackend::Sqlite => {
            let pool =
                connect_sqlite(&config.database.url, config.database.max_connections).await?;
            AppState::new(
                Arc::new(SqliteUserRepository::new(pool.clone())),
                Arc::new(SqliteProductRepository::new(pool)),
                password_hasher,
                token_issuer,
                token_lifetime,
            )
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(state, config.server.request_timeout());
    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
