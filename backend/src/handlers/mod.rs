pub mod cart;
pub mod products;

use axum::{extract::State, http::StatusCode, Json};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use crate::{error::AppError, AppState};

// ── Liveness ──────────────────────────────────────────────────────────────────

pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

// ── Readiness ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Readiness {
    pub database: bool,
    pub redis: bool,
    pub overall: bool,
}

/// Probe both dependencies independently. An unconfigured dependency counts
/// as ready; a failed probe is logged and reported as `false`.
pub async fn check_readiness(state: &AppState) -> Readiness {
    let database = match state.catalog.ping().await {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "Database check failed");
            false
        }
    };

    let redis = match &state.cache {
        Some(cache) => match cache.ping().await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "Redis check failed");
                false
            }
        },
        None => true,
    };

    Readiness {
        database,
        redis,
        overall: database && redis,
    }
}

pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Readiness>) {
    let readiness = check_readiness(&state).await;
    let status = if readiness.overall {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(readiness))
}

// ── Fallback ─────────────────────────────────────────────────────────────────

pub async fn not_found() -> AppError {
    AppError::NotFound
}
