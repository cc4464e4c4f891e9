//! Route definitions for Items domain API

use axum::{middleware, routing::get, Router};
use gearshare_auth::require_auth;

use super::handlers::items;
use super::middleware::ItemsState;

/// Item routes, relative to the API prefix
pub fn routes() -> Router<ItemsState> {
    Router::new()
        .route("/items", get(items::list_items).post(items::create_item))
        .route(
            "/items/{id}",
            get(items::get_item).delete(items::delete_item),
        )
        .fallback(items::unknown_endpoint)
}

/// Every path starting with this belongs to the API, not the UI
pub const API_PREFIX: &str = "/api_v1";

/// The `/api_v1` tree. Every path under it, including unmatched ones,
/// passes through `require_auth` first.
pub fn api_router(state: ItemsState) -> Router {
    let auth = middleware::from_fn_with_state(state.auth.clone(), require_auth);

    Router::new()
        .nest(API_PREFIX, routes().layer(auth))
        .with_state(state)
}

/// Catch-all for paths that share the API prefix without being nested
/// under it (`/api_v1foo`). Authenticated, then always 404.
pub fn api_prefix_router(state: ItemsState) -> Router {
    let auth = middleware::from_fn_with_state(state.auth.clone(), require_auth);

    Router::new()
        .fallback(items::unknown_endpoint)
        .layer(auth)
        .with_state(state)
}
