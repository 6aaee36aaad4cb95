use std::sync::Arc;

use anyhow::Context;
use axum::{middleware::from_fn, routing::get, Router};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

mod cache;
mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod models;

use crate::cache::CacheStore;
use crate::config::Config;
use crate::db::{CatalogSource, PgCatalog, SampleCatalog};

/// Shared application state. Both dependencies are picked once at startup;
/// `cache: None` means the service runs without a cache (mock mode).
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogSource>,
    pub cache: Option<Arc<dyn CacheStore>>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogSource>, cache: Option<Arc<dyn CacheStore>>) -> Self {
        Self { catalog, cache }
    }

    /// Release the cache connection first, then the store pool.
    pub async fn close(&self) {
        if let Some(cache) = &self.cache {
            cache.close().await;
        }
        self.catalog.close().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,shop_api=debug")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    let catalog: Arc<dyn CatalogSource> = match &config.database_url {
        Some(url) => {
            info!("Preparing PostgreSQL pool...");
            let catalog = PgCatalog::connect_lazy(url).context("DATABASE_URL is invalid")?;
            catalog.migrate().await;
            Arc::new(catalog)
        }
        None => {
            info!("DATABASE_URL not set, using mock data");
            Arc::new(SampleCatalog)
        }
    };

    let cache = match &config.redis_url {
        Some(url) => match cache::connect(url).await {
            Ok(cache) => Some(cache),
            Err(err) => {
                error!(error = %err, "Redis connection failed, caching disabled");
                None
            }
        },
        None => {
            info!("REDIS_URL not set, caching disabled");
            None
        }
    };

    let state = AppState::new(catalog, cache);

    info!(
        environment = %config.environment,
        store = state.catalog.name(),
        cache = state.cache.as_ref().map_or("none (mock)", |c| c.name()),
        "Dependencies selected"
    );

    let app = build_router(state.clone());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.close().await;
    info!("Shutdown complete.");

    Ok(())
}

fn build_router(state: AppState) -> Router {
    with_middleware(routes(), state)
}

fn routes() -> Router<AppState> {
    Router::new()
        // ── Probes ──────────────────────────────────────────────────────────
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))

        // ── Catalog ─────────────────────────────────────────────────────────
        .route("/api/products", get(handlers::products::list_products))

        // ── Cart ────────────────────────────────────────────────────────────
        .route(
            "/api/cart",
            get(handlers::cart::get_cart).post(handlers::cart::add_to_cart),
        )
        .fallback(handlers::not_found)
}

fn with_middleware(routes: Router<AppState>, state: AppState) -> Router {
    routes
        .layer(CatchPanicLayer::custom(middleware::handle_panic))
        .layer(from_fn(middleware::security_headers))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, shutting down gracefully");
}
