//! Pokélist Backend
//!
//! REST backend for a Pokémon card collection: named lists of card photos,
//! stored in SQLite, with photos hosted on Cloudinary.

mod api;
mod catalog;
mod config;
mod db;
mod errors;
mod images;
mod models;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use catalog::{Catalog, CatalogReader};
use config::{Config, LogFormat};
use db::Repository;
use images::{CloudinaryStore, DisabledImageStore, ImageStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub reader: Arc<CatalogReader>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let json = config.log_format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Starting Pokélist Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    let images: Arc<dyn ImageStore> = match &config.cloudinary {
        Some(cloudinary) => {
            tracing::info!(
                "Uploading photos to Cloudinary cloud {:?}, folder {:?}",
                cloudinary.cloud_name,
                cloudinary.folder
            );
            Arc::new(CloudinaryStore::new(cloudinary.clone())?)
        }
        None => {
            tracing::warn!("Cloudinary is not configured (CLOUDINARY_*). Photo uploads are disabled!");
            Arc::new(DisabledImageStore)
        }
    };

    // Initialize database, then open the read-only side on the migrated file
    let pool = db::init_database(&config.db_path).await?;
    tracing::info!(
        "Database at schema version {} (latest {})",
        db::schema_version(&pool).await?,
        db::SCHEMA_VERSION
    );
    let read_pool = db::open_read_only(&config.db_path).await?;

    // Create application state
    let state = AppState {
        catalog: Arc::new(Catalog::new(Repository::new(pool), images)),
        reader: Arc::new(CatalogReader::new(Repository::new(read_pool))),
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Editing routes
    let api_routes = Router::new()
        // Lists
        .route("/lists", get(api::list_lists).post(api::create_list))
        .route(
            "/lists/{id}",
            get(api::get_list)
                .put(api::rename_list)
                .delete(api::delete_list),
        )
        // Cards
        .route(
            "/lists/{id}/cards",
            get(api::list_cards).post(api::create_card),
        )
        .route("/lists/{id}/cards/upload", post(api::upload_card))
        .route(
            "/cards/{id}",
            get(api::get_card)
                .put(api::update_card)
                .delete(api::delete_card),
        )
        .route("/cards/{id}/toggle-owned", post(api::toggle_owned))
        .route("/cards/{id}/move", post(api::move_card))
        // Search
        .route("/search", get(api::search_cards))
        // Images
        .route("/images", post(api::upload_image))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes));

    // Shared view routes: GET only
    let view_routes = Router::new()
        .route("/lists", get(api::view::list_lists))
        .route("/lists/{id}", get(api::view::get_list))
        .route("/lists/{id}/cards", get(api::view::list_cards))
        .route("/cards/{id}", get(api::view::get_card))
        .route("/search", get(api::view::search_cards));

    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .nest("/view", view_routes)
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
