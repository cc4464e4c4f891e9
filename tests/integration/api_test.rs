//! API endpoint integration tests
//!
//! Drives the fully composed router: auth gate, item endpoints, key-set
//! rotation, and the static UI fallback.

#![allow(dead_code)]

mod auth;
mod common;
mod items;
mod static_ui;
