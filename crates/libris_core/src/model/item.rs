//! Shared catalog item contract and field validation.
//!
//! # Responsibility
//! - Define the capability set every catalog entry implements.
//! - Provide the field validators used by entity constructors and builders.
//!
//! # Invariants
//! - Text fields that are required must contain non-whitespace characters.
//! - Numeric fields that are present must be strictly positive.

use crate::model::record::{FieldValue, Record, RowDecodeError};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned row identifier.
pub type ItemId = i64;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Catalog entry category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Book,
    Magazine,
}

impl ItemKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Book => "Book",
            Self::Magazine => "Magazine",
        }
    }
}

/// Field invariant violation raised by constructors and `with_*` builders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty or whitespace-only.
    EmptyField { field: &'static str },
    /// Optional numeric field was given a zero or negative value.
    NonPositive { field: &'static str, value: i64 },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyField { field } | Self::NonPositive { field, .. } => field,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { field } => write!(f, "{field} must not be empty"),
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be a positive number, got {value}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Capability set shared by every catalog entry.
pub trait CatalogItem {
    /// Store-assigned id; `None` until the entity is read back from a row.
    fn id(&self) -> Option<ItemId>;

    fn title(&self) -> &str;

    fn kind(&self) -> ItemKind;

    /// Human-readable multi-line summary.
    fn display_info(&self) -> String;

    /// Persistence record in insert-column order. Never contains `id`.
    fn to_record(&self) -> Record;

    /// Builds an entity from a row in the documented column order.
    ///
    /// Pure: never touches the store.
    fn from_row(row: &[FieldValue]) -> Result<Self, RowDecodeError>
    where
        Self: Sized;
}

pub(crate) fn require_text(field: &'static str, value: String) -> ValidationResult<String> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(value)
}

pub(crate) fn require_positive(
    field: &'static str,
    value: Option<i64>,
) -> ValidationResult<Option<i64>> {
    match value {
        Some(number) if number <= 0 => Err(ValidationError::NonPositive {
            field,
            value: number,
        }),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::{require_positive, require_text, ValidationError};

    #[test]
    fn require_text_rejects_whitespace() {
        let err = require_text("title", " \t\n".to_string()).unwrap_err();
        assert_eq!(err, ValidationError::EmptyField { field: "title" });
        assert_eq!(err.field(), "title");
    }

    #[test]
    fn require_text_keeps_value_untrimmed() {
        let value = require_text("author", "  Herbert ".to_string()).unwrap();
        assert_eq!(value, "  Herbert ");
    }

    #[test]
    fn require_positive_accepts_none_and_rejects_zero() {
        assert_eq!(require_positive("year", None).unwrap(), None);
        assert_eq!(require_positive("year", Some(1)).unwrap(), Some(1));
        let err = require_positive("year", Some(0)).unwrap_err();
        assert_eq!(err.to_string(), "year must be a positive number, got 0");
    }
}
