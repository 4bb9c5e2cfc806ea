//! Field values, persistence records and raw store rows.
//!
//! # Responsibility
//! - Provide the storage-neutral value type bound to statement parameters.
//! - Provide typed column readers used by entity row factories.
//!
//! # Invariants
//! - `Record` preserves field insertion order; it is bound positionally.
//! - Row readers never panic on short or mistyped rows.

use crate::model::item::ValidationError;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One column or parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Storage class name used in decode diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Ordered column values of one result row.
pub type Row = Vec<FieldValue>;

/// Field-name to value mapping produced for persistence.
///
/// Field order matches the column list of the insert statement for the
/// entity, so `values()` can be bound directly as positional parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(&'static str, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field, replacing the value if the name already exists.
    pub fn with(mut self, name: &'static str, value: impl Into<FieldValue>) -> Self {
        let value = value.into();
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    pub fn values(&self) -> impl Iterator<Item = &FieldValue> {
        self.fields.iter().map(|(_, value)| value)
    }

    /// Clones the values in field order, ready for statement binding.
    pub fn to_params(&self) -> Vec<FieldValue> {
        self.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Error raised when a stored row cannot be mapped into an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum RowDecodeError {
    /// Row has fewer or more columns than the entity layout.
    Arity { expected: usize, actual: usize },
    /// Column holds a value of an unexpected storage class.
    ColumnType {
        column: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
    /// Column values decode but violate entity invariants.
    Invalid(ValidationError),
}

impl Display for RowDecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Arity { expected, actual } => {
                write!(f, "expected {expected} columns, got {actual}")
            }
            Self::ColumnType {
                column,
                expected,
                actual,
            } => write!(f, "column `{column}` expected {expected}, got {actual}"),
            Self::Invalid(err) => write!(f, "invalid stored row: {err}"),
        }
    }
}

impl Error for RowDecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RowDecodeError {
    fn from(value: ValidationError) -> Self {
        Self::Invalid(value)
    }
}

pub(crate) fn expect_arity(row: &[FieldValue], expected: usize) -> Result<(), RowDecodeError> {
    if row.len() == expected {
        Ok(())
    } else {
        Err(RowDecodeError::Arity {
            expected,
            actual: row.len(),
        })
    }
}

pub(crate) fn column_integer(
    row: &[FieldValue],
    index: usize,
    column: &'static str,
) -> Result<i64, RowDecodeError> {
    match &row[index] {
        FieldValue::Integer(value) => Ok(*value),
        other => Err(column_type_error(column, "integer", other)),
    }
}

pub(crate) fn column_optional_integer(
    row: &[FieldValue],
    index: usize,
    column: &'static str,
) -> Result<Option<i64>, RowDecodeError> {
    match &row[index] {
        FieldValue::Null => Ok(None),
        FieldValue::Integer(value) => Ok(Some(*value)),
        other => Err(column_type_error(column, "integer or null", other)),
    }
}

pub(crate) fn column_text(
    row: &[FieldValue],
    index: usize,
    column: &'static str,
) -> Result<String, RowDecodeError> {
    match &row[index] {
        FieldValue::Text(value) => Ok(value.clone()),
        other => Err(column_type_error(column, "text", other)),
    }
}

pub(crate) fn column_optional_text(
    row: &[FieldValue],
    index: usize,
    column: &'static str,
) -> Result<Option<String>, RowDecodeError> {
    match &row[index] {
        FieldValue::Null => Ok(None),
        FieldValue::Text(value) => Ok(Some(value.clone())),
        other => Err(column_type_error(column, "text or null", other)),
    }
}

fn column_type_error(
    column: &'static str,
    expected: &'static str,
    actual: &FieldValue,
) -> RowDecodeError {
    RowDecodeError::ColumnType {
        column,
        expected,
        actual: actual.type_name(),
    }
}
