//! Magazine entity.
//!
//! # Invariants
//! - `title` contains non-whitespace characters.
//! - `issue_number`, when present, is strictly positive.
//! - Row layout is `(id, title, publisher, issue_number)`.

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

/// Column order shared by every magazine read statement.
pub const MAGAZINE_COLUMNS: [&str; 4] = ["id", "title", "publisher", "issue_number"];

/// A catalogued magazine issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MagazineFields")]
pub struct Magazine {
    id: Option<ItemId>,
    title: String,
    publisher: Option<String>,
    issue_number: Option<i64>,
}

#[derive(Deserialize)]
struct MagazineFields {
    #[serde(default)]
    id: Option<ItemId>,
    title: String,
    #[serde(default)]
    publisher: Option<String>,
    #[serde(default)]
    issue_number: Option<i64>,
}

impl TryFrom<MagazineFields> for Magazine {
    type Error = ValidationError;

    fn try_from(fields: MagazineFields) -> Result<Self, Self::Error> {
        let mut magazine = Magazine::new(fields.title, fields.publisher, fields.issue_number)?;
        magazine.id = fields.id;
        Ok(magazine)
    }
}

impl Magazine {
    /// Creates an unsaved magazine, validating every field.
    pub fn new(
        title: impl Into<String>,
        publisher: Option<String>,
        issue_number: Option<i64>,
    ) -> ValidationResult<Self> {
        Ok(Self {
            id: None,
            title: require_text("title", title.into())?,
            publisher,
            issue_number: require_positive("issue_number", issue_number)?,
        })
    }

    pub fn publisher(&self) -> Option<&str> {
        self.publisher.as_deref()
    }

    pub fn issue_number(&self) -> Option<i64> {
        self.issue_number
    }

    pub fn with_title(mut self, title: impl Into<String>) -> ValidationResult<Self> {
        self.title = require_text("title", title.into())?;
        Ok(self)
    }

    pub fn with_publisher(mut self, publisher: Option<String>) -> Self {
        self.publisher = publisher;
        self
    }

    pub fn with_issue_number(mut self, issue_number: Option<i64>) -> ValidationResult<Self> {
        self.issue_number = require_positive("issue_number", issue_number)?;
        Ok(self)
    }
}

impl CatalogItem for Magazine {
    fn id(&self) -> Option<ItemId> {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn kind(&self) -> ItemKind {
        ItemKind::Magazine
    }

    fn display_info(&self) -> String {
        let mut info = format!("Magazine: {}\n", self.title);
        if let Some(publisher) = self.publisher.as_deref() {
            info.push_str(&format!("   Publisher: {publisher}\n"));
        }
        if let Some(issue_number) = self.issue_number {
            info.push_str(&format!("   Issue: #{issue_number}\n"));
        }
        info
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("title", self.title.as_str())
            .with("publisher", self.publisher.clone())
            .with("issue_number", self.issue_number)
    }

    fn from_row(row: &[FieldValue]) -> Result<Self, RowDecodeError> {
        expect_arity(row, MAGAZINE_COLUMNS.len())?;
        let id = column_integer(row, 0, "id")?;
        let magazine = Magazine::new(
            column_text(row, 1, "title")?,
            column_optional_text(row, 2, "publisher")?,
            column_optional_integer(row, 3, "issue_number")?,
        )?;
        Ok(Self {
            id: Some(id),
            ..magazine
        })
    }
}

impl Display for Magazine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Magazine: {}", self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::Magazine;
    use crate::model::item::CatalogItem;

    #[test]
    fn display_info_formats_issue_with_hash() {
        let magazine = Magazine::new("Byte", Some("McGraw-Hill".into()), Some(42)).unwrap();
        assert_eq!(
            magazine.display_info(),
            "Magazine: Byte\n   Publisher: McGraw-Hill\n   Issue: #42\n"
        );
    }

    #[test]
    fn display_info_with_title_only() {
        let magazine = Magazine::new("Byte", None, None).unwrap();
        assert_eq!(magazine.display_info(), "Magazine: Byte\n");
    }
}
