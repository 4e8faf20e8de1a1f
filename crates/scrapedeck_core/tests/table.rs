use pretty_assertions::assert_eq;
use scrapedeck_core::protocol::SearchEntry;
use scrapedeck_core::{parse_images_per_class, RowField, SearchTable, TableError};

fn fill(table: &mut SearchTable, id: u64, keyword: &str, class_name: &str, dest: &str) {
    table.set_field(id, RowField::Keyword, keyword.into()).unwrap();
    table.set_field(id, RowField::ClassName, class_name.into()).unwrap();
    table.set_field(id, RowField::DestinationFolder, dest.into()).unwrap();
}

#[test]
fn sole_row_cannot_be_deleted() {
    let mut table = SearchTable::new();
    let only = table.rows()[0].id;

    assert_eq!(table.delete_row(only), Err(TableError::LastRow));
    assert_eq!(table.len(), 1);
}

#[test]
fn table_keeps_one_row_through_any_add_delete_sequence() {
    let mut table = SearchTable::new();
    let first = table.rows()[0].id;
    let second = table.add_row();
    let third = table.add_row();

    for id in [first, second, third, first, second, third] {
        let _ = table.delete_row(id);
        assert!(table.len() >= 1);
    }
    assert_eq!(table.len(), 1);
}

#[test]
fn row_ids_are_never_reused() {
    let mut table = SearchTable::new();
    let a = table.add_row();
    table.delete_row(a).unwrap();
    let b = table.add_row();
    assert!(b > a);

    table.reset();
    assert!(table.rows()[0].id > b);
    assert_eq!(table.delete_row(b), Err(TableError::LastRow));
}

#[test]
fn unknown_row_is_reported() {
    let mut table = SearchTable::new();
    table.add_row();
    assert_eq!(table.delete_row(99), Err(TableError::UnknownRow(99)));
    assert_eq!(
        table.set_field(99, RowField::Keyword, "x".into()),
        Err(TableError::UnknownRow(99))
    );
}

#[test]
fn collect_keeps_only_complete_rows() {
    let mut table = SearchTable::new();
    let first = table.rows()[0].id;
    let second = table.add_row();
    fill(&mut table, first, "cats", "animals", "");
    fill(&mut table, second, "", "x", "");

    let request = table.collect(20, " out ");
    assert_eq!(
        request.search_entries,
        vec![SearchEntry {
            keyword: "cats".into(),
            class_name: "animals".into(),
            destination_folder: None,
        }]
    );
    assert_eq!(request.images_per_class, 20);
    assert_eq!(request.destination_folder, "out");
}

#[test]
fn collect_trims_and_keeps_row_destination() {
    let mut table = SearchTable::new();
    let id = table.rows()[0].id;
    fill(&mut table, id, "  red cars ", " vehicles", " cars/red ");

    let request = table.collect(5, "");
    assert_eq!(request.search_entries[0].keyword, "red cars");
    assert_eq!(request.search_entries[0].class_name, "vehicles");
    assert_eq!(
        request.search_entries[0].destination_folder.as_deref(),
        Some("cars/red")
    );
}

#[test]
fn destination_only_row_is_dropped_without_error() {
    let mut table = SearchTable::new();
    let first = table.rows()[0].id;
    let second = table.add_row();
    fill(&mut table, first, "cats", "animals", "");
    fill(&mut table, second, "", "", "somewhere");

    let report = table.validate("10");
    assert!(report.is_valid());
    assert_eq!(table.collect(10, "").search_entries.len(), 1);
}

#[test]
fn half_filled_row_is_an_error() {
    let mut table = SearchTable::new();
    let first = table.rows()[0].id;
    let second = table.add_row();
    fill(&mut table, first, "cats", "", "");
    fill(&mut table, second, "", "animals", "");

    let report = table.validate("10");
    let fields: Vec<_> = report.field_errors.iter().map(|e| (e.row, e.field)).collect();
    assert_eq!(
        fields,
        vec![(first, RowField::ClassName), (second, RowField::Keyword)]
    );
    assert!(report.missing_entries());
    assert!(!report.is_valid());
}

#[test]
fn destination_pattern_is_checked_independently() {
    let mut table = SearchTable::new();
    let id = table.rows()[0].id;
    fill(&mut table, id, "cats", "animals", "bad*name");

    let report = table.validate("10");
    assert_eq!(report.complete_rows, 1);
    assert_eq!(report.field_errors.len(), 1);
    assert_eq!(report.field_errors[0].field, RowField::DestinationFolder);

    table
        .set_field(id, RowField::DestinationFolder, r"ok dir\sub/inner-1_x".into())
        .unwrap();
    assert!(table.validate("10").is_valid());
}

#[test]
fn images_per_class_bounds_are_inclusive() {
    assert_eq!(parse_images_per_class("1"), Some(1));
    assert_eq!(parse_images_per_class("500"), Some(500));
    assert_eq!(parse_images_per_class(" 42 "), Some(42));
    assert_eq!(parse_images_per_class("0"), None);
    assert_eq!(parse_images_per_class("501"), None);
    assert_eq!(parse_images_per_class("abc"), None);
    assert_eq!(parse_images_per_class(""), None);
    assert_eq!(parse_images_per_class("-3"), None);
}

#[test]
fn invalid_images_per_class_fails_validation() {
    let mut table = SearchTable::new();
    let id = table.rows()[0].id;
    fill(&mut table, id, "cats", "animals", "");

    for raw in ["0", "501", "lots"] {
        let report = table.validate(raw);
        assert!(report.images_per_class_error.is_some(), "{raw} accepted");
        assert!(!report.is_valid());
    }
    for raw in ["1", "500"] {
        assert!(table.validate(raw).is_valid(), "{raw} rejected");
    }
}
