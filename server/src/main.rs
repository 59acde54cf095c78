//! Formcraft Server - HTTP boundary for the form builder engine.
//!
//! Holds one builder session, exposes its operations as JSON endpoints and
//! saves the schema to PostgreSQL, or to memory when no database is
//! configured.

mod config;
mod db;
mod error;
mod handlers;
mod routes;
mod session;

use crate::config::Config;
use crate::db::SchemaStore;
use crate::session::Session;
use axum::Router;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: SchemaStore,
    pub config: Arc<Config>,
    pub session: Arc<Mutex<Session>>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "formcraft_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Starting Formcraft Server on {}:{}", config.host, config.port);

    let store = match &config.database_url {
        Some(url) => SchemaStore::Postgres(db::connect(url).await?),
        None => {
            tracing::warn!("DATABASE_URL not set, saved schemas are kept in memory");
            SchemaStore::memory()
        }
    };

    // Resume from the last saved schema when there is one
    let mut session = Session::new(config.engine.clone())?;
    match store.load(&config.storage_key).await {
        Ok(Some(stored)) => match session.restore(stored.body) {
            Ok(view) => tracing::info!(
                key = %config.storage_key,
                nodes = view.form.node_count(),
                "restored saved schema"
            ),
            Err(e) => tracing::warn!("Ignoring unreadable saved schema: {}", e),
        },
        Ok(None) => tracing::debug!("No saved schema, starting empty"),
        Err(e) => tracing::warn!("Could not read saved schema: {}", e),
    }

    // Build application state
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
        session: Arc::new(Mutex::new(session)),
    };

    // Build router
    let app = Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
