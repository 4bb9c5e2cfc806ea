use libris_core::{CatalogItem, FieldValue, ItemKind, Magazine, RowDecodeError, ValidationError};

#[test]
fn magazine_requires_title_and_positive_issue() {
    let err = Magazine::new(" ", None, None).unwrap_err();
    assert_eq!(err, ValidationError::EmptyField { field: "title" });

    let err = Magazine::new("Byte", None, Some(0)).unwrap_err();
    assert_eq!(
        err,
        ValidationError::NonPositive {
            field: "issue_number",
            value: 0
        }
    );

    let magazine = Magazine::new("Byte", None, None).unwrap();
    assert_eq!(magazine.publisher(), None);
    assert_eq!(magazine.issue_number(), None);
    assert_eq!(magazine.id(), None);
    assert_eq!(magazine.kind(), ItemKind::Magazine);
}

#[test]
fn record_uses_insert_column_order() {
    let magazine = Magazine::new("Byte", Some("McGraw-Hill".to_string()), Some(12)).unwrap();
    let record = magazine.to_record();

    assert_eq!(
        record.field_names().collect::<Vec<_>>(),
        ["title", "publisher", "issue_number"]
    );
    assert_eq!(
        record.to_params(),
        vec![
            FieldValue::Text("Byte".to_string()),
            FieldValue::Text("McGraw-Hill".to_string()),
            FieldValue::Integer(12),
        ]
    );
}

#[test]
fn from_row_assigns_id_from_first_column() {
    let row = vec![
        FieldValue::Integer(4),
        FieldValue::Text("Wired".to_string()),
        FieldValue::Null,
        FieldValue::Integer(7),
    ];

    let magazine = Magazine::from_row(&row).unwrap();
    assert_eq!(magazine.id(), Some(4));
    assert_eq!(magazine.title(), "Wired");
    assert_eq!(magazine.publisher(), None);
    assert_eq!(magazine.issue_number(), Some(7));
}

#[test]
fn from_row_rejects_non_positive_stored_issue() {
    let row = vec![
        FieldValue::Integer(4),
        FieldValue::Text("Wired".to_string()),
        FieldValue::Null,
        FieldValue::Integer(-2),
    ];

    let err = Magazine::from_row(&row).unwrap_err();
    assert!(matches!(err, RowDecodeError::Invalid(_)));
}

#[test]
fn with_issue_number_revalidates() {
    let magazine = Magazine::new("Wired", None, Some(1)).unwrap();
    assert!(magazine.clone().with_issue_number(Some(-1)).is_err());

    let next = magazine.with_issue_number(Some(2)).unwrap();
    assert_eq!(next.issue_number(), Some(2));
    assert_eq!(next.to_string(), "Magazine: Wired");
}
