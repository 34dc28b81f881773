//! Catalog server: reads settings from the environment, picks PostgreSQL or the in-memory
//! store, and serves the catalog routes.
//!
//! Run from repo root: `cargo run -p catalog-server`

use library_catalog::{
    app, ensure_catalog_tables, ensure_database_exists, AppState, CatalogStore, MemoryCatalogStore, PgCatalogStore,
    Settings, StaticSessions,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("library_catalog=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;

    let store: Arc<dyn CatalogStore> = match settings.database_url.as_deref() {
        Some(database_url) => {
            ensure_database_exists(database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .connect(database_url)
                .await?;
            ensure_catalog_tables(&pool).await?;
            tracing::info!("using PostgreSQL store");
            Arc::new(PgCatalogStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store, data is lost on exit");
            Arc::new(MemoryCatalogStore::new())
        }
    };
    if settings.sessions.is_empty() {
        tracing::warn!("CATALOG_SESSIONS is empty; every caller is anonymous");
    }
    let sessions = Arc::new(StaticSessions::new(settings.sessions.clone()));

    let bind_addr = settings.bind_addr;
    let state = AppState::new(store, sessions, settings);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("library catalog listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
