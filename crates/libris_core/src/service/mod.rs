//! Catalog use-case services.
//!
//! # Responsibility
//! - Turn discrete user intents into entity construction and gateway calls.
//! - Keep the console layer decoupled from SQL and row layouts.

pub mod catalog_service;
