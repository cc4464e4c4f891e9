//! HTTP handlers for the Items domain

pub mod items;
