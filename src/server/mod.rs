pub mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Duration;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::TokenService;
use crate::config::Config;
use crate::core::AppState;
use crate::db::Database;
use crate::storage::{self, PHOTO_ROUTE};

pub use routes::build_router;

/// Run the web server until it fails.
pub async fn run(config: Config) -> Result<()> {
    config.validate()?;

    let db = Database::new(config.resolve_db_path()?)?;
    let tokens = TokenService::new(
        &config.secret_key,
        Duration::minutes(config.access_token_expire_minutes),
    );
    let photos = storage::from_config(&config.photos);

    let state = Arc::new(AppState::new(db, tokens, photos));
    let mut app = build_router(state);

    // Serve uploaded photos when stored locally
    if let Some(dir) = config.photos.dir.as_deref().filter(|d| !d.is_empty()) {
        tracing::info!("Serving photos from {}", dir);
        app = app.nest_service(PHOTO_ROUTE, ServeDir::new(dir));
    }

    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
