//! # Solstore API Server
//!
//! HTTP server for the solar inverter storefront: a public landing page
//! (hero sliders plus the product list) and a session-authenticated admin
//! area for managing products, sliders, and admin accounts.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/solstore \
//! SESSION_SECRET=$(openssl rand -hex 32) \
//! cargo run -p solstore-api
//! ```

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use solstore_api::{app, config::Config};
use solstore_shared::db::{migrations, pool};
use solstore_shared::storage::local::LocalImageStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "solstore_api=debug,solstore_shared=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Solstore API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    migrations::run_migrations(&db).await?;

    let images = Arc::new(LocalImageStore::new(config.media.root.clone()));

    let bind_address = config.bind_address();
    let state = app::AppState::new(db, config, images);
    let router = app::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
