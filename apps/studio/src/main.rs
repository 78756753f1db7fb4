mod config;
mod errors;
mod export;
mod llm_client;
mod models;
mod normalize;
mod projection;
mod rewrite;
mod routes;
mod state;
mod storage;
mod sync;
mod theme;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::GeminiBackend;
use crate::rewrite::RewriteClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{load_session, FileStore, KeyValueStore, MemoryStore};
use crate::sync::{spawn_controller, DirTemplateSource};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("cv_studio={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cv-studio v{}", env!("CARGO_PKG_VERSION"));

    // Local storage; a broken store file degrades to an in-memory session
    let store: Arc<dyn KeyValueStore> = match FileStore::open(&config.store_path) {
        Ok(store) => {
            info!("Store opened at {}", store.path().display());
            Arc::new(store)
        }
        Err(e) => {
            warn!("Store unavailable, changes will not survive a restart: {e}");
            Arc::new(MemoryStore::new())
        }
    };
    let session = load_session(store.as_ref());

    // Sync controller owns the preview surface from here on
    let templates = Arc::new(DirTemplateSource::new(&config.templates_dir));
    let (sync, controller) = spawn_controller(
        session,
        Arc::clone(&store),
        templates,
        config.sync_settings(),
    );

    // AI rewrite
    let backend = Arc::new(GeminiBackend::new()?);
    let rewrite = RewriteClient::new(backend, config.retry_policy());
    info!(
        "Rewrite client initialized ({} candidate models, {} passes)",
        config.gemini_models.len(),
        config.ai_passes
    );

    let state = AppState {
        sync: sync.clone(),
        store,
        rewrite,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the editor has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sync.shutdown().await.ok();
    controller.await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
