//! Catalog domain model for books and magazines.
//!
//! # Responsibility
//! - Define the value types stored in the catalog.
//! - Enforce field invariants at construction time.
//! - Map between entities and the flat column rows used by the store.
//!
//! # Invariants
//! - Every entity has a non-empty title.
//! - `id` is only ever populated from a stored row.
//! - Entities are immutable; `with_*` builders re-validate and return new values.

pub mod book;
pub mod item;
pub mod magazine;
pub mod record;
