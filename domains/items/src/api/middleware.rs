//! Items domain state and auth backend integration

use std::sync::Arc;

use axum::extract::FromRef;
use gearshare_auth::AuthBackend;

use crate::repository::ItemStore;

/// Application state for the Items domain
#[derive(Clone)]
pub struct ItemsState {
    pub store: Arc<dyn ItemStore>,
    pub auth: AuthBackend,
}

impl ItemsState {
    pub fn new(store: Arc<dyn ItemStore>, auth: AuthBackend) -> Self {
        Self { store, auth }
    }
}

impl FromRef<ItemsState> for AuthBackend {
    fn from_ref(state: &ItemsState) -> Self {
        state.auth.clone()
    }
}
