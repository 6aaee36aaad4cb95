use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::json;
use tracing::info;

use crate::{
    error::{AppError, AppResult},
    models::{cart_key, AddToCart, ANONYMOUS_SESSION},
    AppState,
};

pub const SESSION_HEADER: &str = "x-session-id";

/// Session named by the request header, used as-is. Absent, empty or
/// non-UTF-8 values all land in the shared anonymous bucket.
pub fn session_id(headers: &HeaderMap) -> &str {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(ANONYMOUS_SESSION)
}

// ── POST /api/cart ────────────────────────────────────────────────────────────

pub async fn add_to_cart(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<AddToCart>, JsonRejection>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let Json(payload) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let session = session_id(&headers);

    let Some(cache) = &state.cache else {
        return Ok((
            StatusCode::OK,
            Json(json!({ "message": "Product added to cart (mock mode)" })),
        ));
    };

    let cart = cache
        .hincr_by(&cart_key(session), payload.product_id, payload.quantity)
        .await?;

    info!(
        session,
        product_id = payload.product_id,
        quantity = payload.quantity,
        lines = cart.len(),
        "Added to cart"
    );

    Ok((
        StatusCode::OK,
        Json(json!({ "cart": cart, "message": "Product added to cart" })),
    ))
}

// ── GET /api/cart ─────────────────────────────────────────────────────────────

pub async fn get_cart(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let session = session_id(&headers);

    let Some(cache) = &state.cache else {
        return Ok((
            StatusCode::OK,
            Json(json!({ "message": "Cart retrieval (mock mode)" })),
        ));
    };

    let cart = cache.hgetall(&cart_key(session)).await?;
    Ok((StatusCode::OK, Json(json!(cart))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn missing_header_means_anonymous() {
        assert_eq!(session_id(&HeaderMap::new()), ANONYMOUS_SESSION);
    }

    #[test]
    fn empty_header_means_anonymous() {
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_HEADER, HeaderValue::from_static(""));
        assert_eq!(session_id(&headers), ANONYMOUS_SESSION);
    }

    #[test]
    fn padded_header_is_a_distinct_session() {
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_HEADER, HeaderValue::from_static(" s1"));
        assert_eq!(session_id(&headers), " s1");
        assert_ne!(session_id(&headers), "s1");
    }

    #[test]
    fn header_value_is_the_session() {
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_HEADER, HeaderValue::from_static("s1"));
        assert_eq!(session_id(&headers), "s1");
    }
}
