mod api;
mod config;
mod storage;

use crate::api::{health_handler, AppState};
use crate::config::AppConfig;
use crate::storage::{MongoReviewStore, ReviewStore};
use axum::{
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    info!("🚀 Starting Airline Review API Server");

    // Load configuration (.env is optional)
    let _ = dotenvy::dotenv();
    let config = AppConfig::from_env()?;
    info!("📋 Configuration loaded");
    info!("   - Server port: {}", config.port);

    // Connect to MongoDB
    info!("💾 Connecting to MongoDB...");
    let store = Arc::new(MongoReviewStore::connect(&config.mongodb_uri).await?);
    let review_count = store.count().await?;
    info!("✅ Review store ready ({} reviews)", review_count);

    // Create application state
    let state = AppState { store };

    // Build router with modular routes
    let app = Router::new()
        .route("/health", get(health_handler))
        .merge(api::review::routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📡 Available endpoints:");
    info!("   GET  /health        - Health check");
    info!("   GET  /api/reviews   - List all reviews");
    info!("   POST /api/reviews   - Save a new review");
    info!("");
    info!("✨ Server is ready to accept requests!");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutting down gracefully");

    Ok(())
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutdown signal received");
}
