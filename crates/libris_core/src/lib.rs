//! Core catalog logic for Libris.
//! Owns the book/magazine invariants, the SQLite gateway and the use-case service.

pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::book::{Book, BOOK_COLUMNS};
pub use model::item::{CatalogItem, ItemId, ItemKind, ValidationError, ValidationResult};
pub use model::magazine::{Magazine, MAGAZINE_COLUMNS};
pub use model::record::{FieldValue, Record, Row, RowDecodeError};
pub use service::catalog_service::{AddOutcome, CatalogError, CatalogResult, CatalogService};
pub use store::{CatalogStore, SqliteGateway, StoreConfig, StoreError, StoreResult, StoreTarget};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
