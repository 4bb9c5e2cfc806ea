//! Book and magazine use-case service.
//!
//! # Responsibility
//! - Provide list/add/search entry points for both item kinds.
//! - Map gateway rows into entities and gateway signals into outcomes.
//!
//! # Invariants
//! - Each operation issues exactly one statement through the store.
//! - Listings and search results are ordered by title ascending.
//! - Entity validation runs before any statement is issued.
//! - Ids assigned by the store on insert are not read back.
//! - A stored row that breaks an entity invariant is skipped and logged; a row
//!   of the wrong shape fails the whole read.

use crate::model::book::Book;
use crate::model::item::{CatalogItem, ValidationResult};
use crate::model::magazine::Magazine;
use crate::model::record::{FieldValue, RowDecodeError};
use crate::store::CatalogStore;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

const BOOK_INSERT_SQL: &str = "INSERT INTO books (title, author, year, isbn) VALUES (?, ?, ?, ?)";
const BOOK_LIST_SQL: &str = "SELECT id, title, author, year, isbn FROM books ORDER BY title";
const BOOK_SEARCH_SQL: &str = "SELECT id, title, author, year, isbn
     FROM books
     WHERE title LIKE ? OR author LIKE ?
     ORDER BY title";

const MAGAZINE_INSERT_SQL: &str =
    "INSERT INTO magazines (title, publisher, issue_number) VALUES (?, ?, ?)";
const MAGAZINE_LIST_SQL: &str =
    "SELECT id, title, publisher, issue_number FROM magazines ORDER BY title";
const MAGAZINE_SEARCH_SQL: &str = "SELECT id, title, publisher, issue_number
     FROM magazines
     WHERE title LIKE ? OR publisher LIKE ?
     ORDER BY title";

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Read-side failure surfaced to the presentation layer.
#[derive(Debug)]
pub enum CatalogError {
    /// Gateway reported a failed read (connection or statement).
    StoreUnavailable,
    /// A returned row has the wrong arity or column types for the entity.
    CorruptRow(RowDecodeError),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoreUnavailable => write!(
                f,
                "catalog store is unavailable; ensure the database exists and is initialized"
            ),
            Self::CorruptRow(err) => write!(f, "catalog contains an unreadable row: {err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StoreUnavailable => None,
            Self::CorruptRow(err) => Some(err),
        }
    }
}

impl From<RowDecodeError> for CatalogError {
    fn from(value: RowDecodeError) -> Self {
        Self::CorruptRow(value)
    }
}

/// Result of an insert attempt for an already-validated entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome<T> {
    /// Row stored. The entity is returned as constructed; its `id` stays `None`.
    Added(T),
    /// Store rejected or could not run the insert.
    Failed,
}

impl<T> AddOutcome<T> {
    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added(_))
    }
}

/// Catalog facade over a store implementation.
pub struct CatalogService<S: CatalogStore> {
    store: S,
}

impl<S: CatalogStore> CatalogService<S> {
    /// Creates a service using the provided store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Lists every book ordered by title. Empty table yields an empty list.
    pub fn list_books(&mut self) -> CatalogResult<Vec<Book>> {
        self.fetch_items("books_list", BOOK_LIST_SQL, &[])
    }

    /// Validates and inserts a new book.
    ///
    /// # Errors
    /// - Returns `ValidationError` before touching the store when a field is invalid.
    pub fn add_book(
        &mut self,
        title: &str,
        author: &str,
        year: Option<i64>,
        isbn: Option<&str>,
    ) -> ValidationResult<AddOutcome<Book>> {
        let book = Book::new(title, author, year, isbn.map(str::to_string))?;
        Ok(self.insert_item("books_add", BOOK_INSERT_SQL, book))
    }

    /// Books whose title or author contains `keyword`, ordered by title.
    ///
    /// Case sensitivity follows SQLite `LIKE` (ASCII case-insensitive).
    pub fn search_books(&mut self, keyword: &str) -> CatalogResult<Vec<Book>> {
        let pattern = like_pattern(keyword);
        self.fetch_items("books_search", BOOK_SEARCH_SQL, &[pattern.clone(), pattern])
    }

    /// Lists every magazine ordered by title.
    pub fn list_magazines(&mut self) -> CatalogResult<Vec<Magazine>> {
        self.fetch_items("magazines_list", MAGAZINE_LIST_SQL, &[])
    }

    /// Validates and inserts a new magazine.
    pub fn add_magazine(
        &mut self,
        title: &str,
        publisher: Option<&str>,
        issue_number: Option<i64>,
    ) -> ValidationResult<AddOutcome<Magazine>> {
        let magazine = Magazine::new(title, publisher.map(str::to_string), issue_number)?;
        Ok(self.insert_item("magazines_add", MAGAZINE_INSERT_SQL, magazine))
    }

    /// Magazines whose title or publisher contains `keyword`, ordered by title.
    pub fn search_magazines(&mut self, keyword: &str) -> CatalogResult<Vec<Magazine>> {
        let pattern = like_pattern(keyword);
        self.fetch_items(
            "magazines_search",
            MAGAZINE_SEARCH_SQL,
            &[pattern.clone(), pattern],
        )
    }

    /// Releases the underlying store connection.
    pub fn close(&mut self) {
        self.store.close();
    }

    fn fetch_items<T: CatalogItem>(
        &mut self,
        event: &str,
        statement: &str,
        params: &[FieldValue],
    ) -> CatalogResult<Vec<T>> {
        let Some(rows) = self.store.fetch_all(statement, params) else {
            error!("event={event} module=service status=error error_code=store_unavailable");
            return Err(CatalogError::StoreUnavailable);
        };

        let mut items = Vec::with_capacity(rows.len());
        let mut skipped = 0usize;
        for row in &rows {
            match T::from_row(row) {
                Ok(item) => items.push(item),
                Err(RowDecodeError::Invalid(err)) => {
                    skipped += 1;
                    warn!(
                        "event={event} module=service status=skip error_code=corrupt_row field={}",
                        err.field()
                    );
                }
                Err(err) => {
                    error!("event={event} module=service status=error error_code=row_shape error={err}");
                    return Err(CatalogError::from(err));
                }
            }
        }

        info!(
            "event={event} module=service status=ok count={} skipped={skipped}",
            items.len()
        );
        Ok(items)
    }

    fn insert_item<T: CatalogItem>(
        &mut self,
        event: &str,
        statement: &str,
        item: T,
    ) -> AddOutcome<T> {
        let params = item.to_record().to_params();
        if self.store.execute(statement, &params) {
            info!("event={event} module=service status=ok kind={:?}", item.kind());
            AddOutcome::Added(item)
        } else {
            error!("event={event} module=service status=error error_code=insert_failed");
            AddOutcome::Failed
        }
    }
}

fn like_pattern(keyword: &str) -> FieldValue {
    FieldValue::Text(format!("%{keyword}%"))
}
