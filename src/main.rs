//! Biblioteca Server - school library front desk
//!
//! A Rust REST API server for a school library.

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use biblioteca_server::{
    api,
    config::{AppConfig, StoreBackend},
    services::auth,
    store::{DocumentStore, MemoryStore, PgStore},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().nth(1).as_deref() == Some("--hash-password") {
        return print_password_hash();
    }

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("biblioteca_server={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Biblioteca Server v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn DocumentStore> = match config.store.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory document store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Postgres => {
            // Create database connection pool
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .min_connections(config.database.min_connections)
                .connect(&config.database.url)
                .await
                .context("Failed to connect to database")?;

            tracing::info!("Connected to database");

            // Run migrations
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;

            tracing::info!("Database migrations completed");

            let store = PgStore::new(pool);
            store
                .listen()
                .await
                .context("Failed to listen for document changes")?;
            Arc::new(store)
        }
    };

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    let state = AppState::new(config, store).context("Failed to create services")?;
    let app = api::router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().context("Invalid host address")?,
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Read a password from stdin and print its argon2 hash for `auth.admins[].password_hash`
fn print_password_hash() -> anyhow::Result<()> {
    let mut password = String::new();
    std::io::stdin()
        .read_line(&mut password)
        .context("Failed to read password from stdin")?;
    let hash = auth::hash_password(password.trim_end_matches(['\r', '\n']))?;
    println!("{}", hash);
    Ok(())
}
