//! Shared utilities, configuration, and error handling for Gearshare
//!
//! This crate provides common functionality used across the Gearshare backend:
//! - Configuration management following 12-factor principles
//! - Error types and their HTTP mapping
//! - Validated JSON extraction for request bodies

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;

pub use config::Config;
pub use db::RepositoryError;
pub use error::{Error, Result};
pub use extractors::{validation_message, ValidatedJson};
