use std::time::{Duration, Instant};

use axum::{extract::State, http::StatusCode, Json};
use tracing::{debug, info, warn};

use crate::{
    cache::CacheStore,
    db::CatalogSource,
    error::AppResult,
    models::Product,
    AppState,
};

/// Key holding the whole serialized product list.
pub const PRODUCTS_CACHE_KEY: &str = "products";
pub const PRODUCTS_CACHE_TTL: Duration = Duration::from_secs(300);

/// Cache-aside read of the catalog.
///
/// A cache hit never touches the store. On a miss the store is read and the
/// list written back with [`PRODUCTS_CACHE_TTL`]; a failed write-back is
/// logged and ignored. Built-in sample data is returned as-is and never cached.
pub async fn fetch_products(
    catalog: &dyn CatalogSource,
    cache: Option<&dyn CacheStore>,
) -> AppResult<Vec<Product>> {
    if let Some(cache) = cache {
        if let Some(cached) = cache.get(PRODUCTS_CACHE_KEY).await? {
            match serde_json::from_str::<Vec<Product>>(&cached) {
                Ok(products) => {
                    debug!(count = products.len(), "Product list served from cache");
                    return Ok(products);
                }
                Err(err) => warn!(error = %err, "Discarding undecodable cached product list"),
            }
        }
    }

    let products = catalog.list_products().await?;

    if let Some(cache) = cache.filter(|_| !catalog.is_mock()) {
        let payload = serde_json::to_string(&products)?;
        if let Err(err) = cache
            .set_ex(PRODUCTS_CACHE_KEY, &payload, PRODUCTS_CACHE_TTL)
            .await
        {
            warn!(error = %err, "Caching product list failed");
        }
    }

    Ok(products)
}

pub async fn list_products(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Vec<Product>>)> {
    let start = Instant::now();
    let products = fetch_products(state.catalog.as_ref(), state.cache.as_deref()).await?;

    info!(
        count = products.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Listed products"
    );

    Ok((StatusCode::OK, Json(products)))
}
