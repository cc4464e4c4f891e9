//! Gearshare application composition root
//!
//! Composes the item API and the static UI bundle into a single router.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Request,
    http::{header, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Router,
};
use gearshare_auth::{AuthBackend, AuthConfig};
use gearshare_common::config::Config;
use gearshare_items::{ItemStore, ItemsState, MemoryItemStore, PgItemStore, API_PREFIX};
use sqlx::postgres::PgPoolOptions;
use tower::{ServiceBuilder, ServiceExt};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 100 * 1024;

/// Auth settings derived from the process configuration
pub fn auth_config(config: &Config) -> AuthConfig {
    AuthConfig {
        issuer: config.auth_issuer.clone(),
        audience: config.auth_audience.clone(),
        jwks_uri: config.auth_jwks_uri.clone(),
        jwks_requests_per_minute: config.jwks_requests_per_minute,
        jwks_cache_ttl: Duration::from_secs(config.jwks_cache_ttl_secs),
    }
}

/// Open the configured item store: Postgres when `DATABASE_URL` is set,
/// otherwise an in-memory store.
pub async fn connect_store(config: &Config) -> Result<Arc<dyn ItemStore>, anyhow::Error> {
    let Some(url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set; items are kept in memory and lost on restart");
        return Ok(Arc::new(MemoryItemStore::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(url)
        .await
        .map_err(|e| anyhow::anyhow!("Database connection failed: {}", e))?;

    info!("Database connection established");

    let store = PgItemStore::new(pool);
    store.migrate().await?;

    info!("Database migrations applied");
    Ok(Arc::new(store))
}

/// Create the main application router with all routes and middleware
pub async fn create_app(config: &Config) -> Result<Router, anyhow::Error> {
    let store = connect_store(config).await?;
    let auth = AuthBackend::new(auth_config(config))?;

    Ok(build_router(ItemsState::new(store, auth), &config.static_dir))
}

/// Compose the API and static UI with the shared HTTP layers.
///
/// Paths not prefixed `/api_v1` are served from `static_dir`; anything
/// without a matching file gets `index.html` so client-side routes resolve.
pub fn build_router(state: ItemsState, static_dir: impl AsRef<Path>) -> Router {
    let static_dir = static_dir.as_ref();
    let ui = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));
    let stray_api = gearshare_items::api_prefix_router(state.clone());

    gearshare_items::api_router(state)
        .fallback(move |req: Request| unmatched(stray_api.clone(), ui.clone(), req))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .into_inner(),
        )
        // Hardening headers, added unless a handler already set them
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("x-dns-prefetch-control"),
            HeaderValue::from_static("off"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=15552000; includeSubDomains"),
        ))
        // Outermost: its response body type does not satisfy CorsLayer
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
}

/// Requests the API tree did not claim: anything still carrying the API
/// prefix stays behind authentication, the rest is the UI.
async fn unmatched(stray_api: Router, ui: ServeDir<ServeFile>, req: Request) -> Response {
    if req.uri().path().starts_with(API_PREFIX) {
        return stray_api.oneshot(req).await.into_response();
    }
    ui.oneshot(req).await.into_response()
}
