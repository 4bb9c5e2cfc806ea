use libris_core::{
    AddOutcome, CatalogError, CatalogItem, CatalogService, CatalogStore, FieldValue, Row,
    SqliteGateway, StoreConfig,
};

const SCHEMA_SQL: &str = include_str!("../schema.sql");

/// Schema DDL split into single statements, comment lines removed.
fn schema_statements() -> Vec<String> {
    let sql = SCHEMA_SQL
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");
    sql.split(';')
        .map(str::trim)
        .filter(|statement| !statement.is_empty())
        .map(str::to_string)
        .collect()
}

fn catalog_gateway() -> SqliteGateway {
    let mut gateway = SqliteGateway::new(StoreConfig::in_memory());
    for statement in schema_statements() {
        assert!(
            gateway.execute(&statement, &[]),
            "schema statement failed: {statement}"
        );
    }
    gateway
}

fn catalog_service() -> CatalogService<SqliteGateway> {
    CatalogService::new(catalog_gateway())
}

/// Store that can never be reached.
struct UnreachableStore;

impl CatalogStore for UnreachableStore {
    fn execute(&mut self, _statement: &str, _params: &[FieldValue]) -> bool {
        false
    }

    fn fetch_all(&mut self, _statement: &str, _params: &[FieldValue]) -> Option<Vec<Row>> {
        None
    }

    fn fetch_one(&mut self, _statement: &str, _params: &[FieldValue]) -> Option<Row> {
        None
    }

    fn close(&mut self) {}
}

#[test]
fn schema_file_creates_both_catalog_tables() {
    let statements = schema_statements();
    assert_eq!(statements.len(), 2);
    assert!(statements[0].starts_with("CREATE TABLE IF NOT EXISTS books"));
    assert!(statements[1].starts_with("CREATE TABLE IF NOT EXISTS magazines"));

    let mut gateway = catalog_gateway();
    let tables = gateway
        .fetch_all(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('books', 'magazines') ORDER BY name",
            &[],
        )
        .unwrap();
    assert_eq!(
        tables,
        vec![
            vec![FieldValue::Text("books".to_string())],
            vec![FieldValue::Text("magazines".to_string())],
        ]
    );
}

#[test]
fn list_books_on_empty_table_is_empty_not_failure() {
    let mut service = catalog_service();
    assert!(service.list_books().unwrap().is_empty());
    assert!(service.list_magazines().unwrap().is_empty());
}

#[test]
fn added_book_is_listed_with_store_assigned_id() {
    let mut service = catalog_service();

    let outcome = service
        .add_book("Dune", "Herbert", Some(1965), Some("0441172719"))
        .unwrap();
    let AddOutcome::Added(created) = outcome else {
        panic!("insert should succeed");
    };
    assert_eq!(created.id(), None);

    let books = service.list_books().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].id(), Some(1));
    assert_eq!(books[0].title(), "Dune");
    assert_eq!(books[0].isbn(), Some("0441172719"));
}

#[test]
fn search_books_matches_title_or_author() {
    let mut service = catalog_service();
    service
        .add_book("Dune", "Herbert", Some(1965), Some("0441172719"))
        .unwrap();
    service
        .add_book("Emma", "Jane Austen", Some(1815), None)
        .unwrap();

    let by_title = service.search_books("dune").unwrap();
    let by_author = service.search_books("Herbert").unwrap();

    assert_eq!(by_title.len(), 1);
    assert_eq!(by_title, by_author);
    assert_eq!(by_title[0].title(), "Dune");

    assert!(service.search_books("Tolkien").unwrap().is_empty());
}

#[test]
fn search_results_are_sorted_by_title() {
    let mut service = catalog_service();
    service.add_book("Persuasion", "Jane Austen", None, None).unwrap();
    service.add_book("Emma", "Jane Austen", None, None).unwrap();
    service.add_book("Mansfield Park", "Jane Austen", None, None).unwrap();

    let titles: Vec<String> = service
        .search_books("austen")
        .unwrap()
        .iter()
        .map(|book| book.title().to_string())
        .collect();
    assert_eq!(titles, ["Emma", "Mansfield Park", "Persuasion"]);
}

#[test]
fn list_magazines_is_sorted_by_title() {
    let mut service = catalog_service();
    for title in ["Zebra Tales", "Apple Weekly", "Mango Journal"] {
        let outcome = service.add_magazine(title, None, None).unwrap();
        assert!(outcome.is_added());
    }

    let titles: Vec<String> = service
        .list_magazines()
        .unwrap()
        .iter()
        .map(|magazine| magazine.title().to_string())
        .collect();
    assert_eq!(titles, ["Apple Weekly", "Mango Journal", "Zebra Tales"]);
}

#[test]
fn search_magazines_matches_title_or_publisher() {
    let mut service = catalog_service();
    service
        .add_magazine("Byte", Some("McGraw-Hill"), Some(12))
        .unwrap();
    service.add_magazine("Wired", Some("Conde Nast"), None).unwrap();

    let by_publisher = service.search_magazines("nast").unwrap();
    assert_eq!(by_publisher.len(), 1);
    assert_eq!(by_publisher[0].title(), "Wired");

    let by_title = service.search_magazines("yt").unwrap();
    assert_eq!(by_title.len(), 1);
    assert_eq!(by_title[0].publisher(), Some("McGraw-Hill"));
    assert_eq!(by_title[0].issue_number(), Some(12));
}

#[test]
fn legacy_row_with_invalid_year_does_not_hide_valid_books() {
    let mut gateway = catalog_gateway();
    assert!(gateway.execute(
        "INSERT INTO books (title, author, year, isbn) VALUES (?, ?, ?, ?)",
        &[
            FieldValue::Text("Legacy".to_string()),
            FieldValue::Text("Herbert".to_string()),
            FieldValue::Integer(0),
            FieldValue::Null,
        ],
    ));
    let mut service = CatalogService::new(gateway);
    service
        .add_book("Dune", "Herbert", Some(1965), None)
        .unwrap();

    let books = service.list_books().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title(), "Dune");

    let found = service.search_books("Herbert").unwrap();
    assert_eq!(found, books);
}

#[test]
fn add_book_against_unreachable_store_is_failure_outcome() {
    let mut service = CatalogService::new(UnreachableStore);

    let outcome = service.add_book("Dune", "Herbert", None, None).unwrap();
    assert_eq!(outcome, AddOutcome::Failed);
    assert!(!service.add_magazine("Byte", None, None).unwrap().is_added());
}

#[test]
fn add_book_against_unreachable_sqlite_file_is_failure_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = SqliteGateway::new(StoreConfig::file(dir.path().join("absent.db")));
    let mut service = CatalogService::new(gateway);

    let outcome = service.add_book("Dune", "Herbert", None, None).unwrap();
    assert!(!outcome.is_added());
    assert!(service.store().last_error().is_some());
}

#[test]
fn reads_against_unreachable_store_are_store_unavailable() {
    let mut service = CatalogService::new(UnreachableStore);

    assert!(matches!(
        service.list_books(),
        Err(CatalogError::StoreUnavailable)
    ));
    assert!(matches!(
        service.search_magazines("x"),
        Err(CatalogError::StoreUnavailable)
    ));
}

#[test]
fn validation_errors_surface_before_the_store() {
    let mut service = CatalogService::new(UnreachableStore);

    let err = service.add_book("Dune", " ", None, None).unwrap_err();
    assert_eq!(err.field(), "author");
    let err = service.add_magazine("Byte", None, Some(-1)).unwrap_err();
    assert_eq!(err.field(), "issue_number");
}

#[test]
fn service_can_borrow_a_gateway_and_close_it() {
    let mut gateway = SqliteGateway::new(StoreConfig::in_memory());
    {
        let mut service = CatalogService::new(&mut gateway);
        assert!(service.list_books().is_err());
        service.close();
        service.close();
    }
    assert!(!gateway.is_open());
}
