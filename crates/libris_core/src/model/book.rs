//! Book entity.
//!
//! # Invariants
//! - `title` and `author` contain non-whitespace characters.
//! - `year`, when present, is strictly positive.
//! - Row layout is `(id, title, author, year, isbn)`.

use crate::model::item::{
    require_positive, require_text, CatalogItem, ItemId, ItemKind, ValidationError,
    ValidationResult,
};
use crate::model::record::{
    column_integer, column_optional_integer, column_optional_text, column_text, expect_arity,
    FieldValue, Record, RowDecodeError,
};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Column order shared by every book read statement.
pub const BOOK_COLUMNS: [&str; 5] = ["id", "title", "author", "year", "isbn"];

/// A catalogued book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BookFields")]
pub struct Book {
    id: Option<ItemId>,
    title: String,
    author: String,
    year: Option<i64>,
    isbn: Option<String>,
}

/// Unvalidated wire shape; deserialization funnels through `Book::new`.
#[derive(Deserialize)]
struct BookFields {
    #[serde(default)]
    id: Option<ItemId>,
    title: String,
    author: String,
    #[serde(default)]
    year: Option<i64>,
    #[serde(default)]
    isbn: Option<String>,
}

impl TryFrom<BookFields> for Book {
    type Error = ValidationError;

    fn try_from(fields: BookFields) -> Result<Self, Self::Error> {
        let mut book = Book::new(fields.title, fields.author, fields.year, fields.isbn)?;
        book.id = fields.id;
        Ok(book)
    }
}

impl Book {
    /// Creates an unsaved book, validating every field.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: Option<i64>,
        isbn: Option<String>,
    ) -> ValidationResult<Self> {
        Ok(Self {
            id: None,
            title: require_text("title", title.into())?,
            author: require_text("author", author.into())?,
            year: require_positive("year", year)?,
            isbn,
        })
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year(&self) -> Option<i64> {
        self.year
    }

    pub fn isbn(&self) -> Option<&str> {
        self.isbn.as_deref()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> ValidationResult<Self> {
        self.title = require_text("title", title.into())?;
        Ok(self)
    }

    pub fn with_author(mut self, author: impl Into<String>) -> ValidationResult<Self> {
        self.author = require_text("author", author.into())?;
        Ok(self)
    }

    pub fn with_year(mut self, year: Option<i64>) -> ValidationResult<Self> {
        self.year = require_positive("year", year)?;
        Ok(self)
    }

    /// ISBN is free-form; no validation applies.
    pub fn with_isbn(mut self, isbn: Option<String>) -> Self {
        self.isbn = isbn;
        self
    }
}

impl CatalogItem for Book {
    fn id(&self) -> Option<ItemId> {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Book
    }

    fn display_info(&self) -> String {
        let mut info = format!("Book: {}\n   Author: {}\n", self.title, self.author);
        if let Some(year) = self.year {
            info.push_str(&format!("   Year: {year}\n"));
        }
        if let Some(isbn) = self.isbn.as_deref() {
            info.push_str(&format!("   ISBN: {isbn}\n"));
        }
        info
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("title", self.title.as_str())
            .with("author", self.author.as_str())
            .with("year", self.year)
            .with("isbn", self.isbn.clone())
    }

    fn from_row(row: &[FieldValue]) -> Result<Self, RowDecodeError> {
        expect_arity(row, BOOK_COLUMNS.len())?;
        let id = column_integer(row, 0, "id")?;
        let book = Book::new(
            column_text(row, 1, "title")?,
            column_text(row, 2, "author")?,
            column_optional_integer(row, 3, "year")?,
            column_optional_text(row, 4, "isbn")?,
        )?;
        Ok(Self {
            id: Some(id),
            ..book
        })
    }
}

impl Display for Book {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Book: {}", self.title)
    }
}
