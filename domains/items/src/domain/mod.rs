//! Items domain model

pub mod entities;
