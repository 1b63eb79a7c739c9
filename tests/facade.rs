#![cfg(feature = "csv")]

use sheetgate::{
    CellValue, CodecRole, Document, FacadeError, FormatType, SaveDestination, SpreadsheetFacade,
};

#[test]
fn acquire_without_path_returns_fresh_document() {
    let facade = SpreadsheetFacade::new();
    let a = facade.acquire(None).unwrap();
    assert!(a.is_empty());
    assert_eq!(a.sheet_count(), 0);

    // Successive calls return independent documents.
    let mut b = facade.acquire(None).unwrap();
    b.add_sheet("Scratch").set_cell(1, 1, "x");
    let c = facade.acquire(None).unwrap();
    assert!(c.is_empty());
}

#[test]
fn acquire_csv_path_loads_values() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("input.csv");
    std::fs::write(&path, "hello,2\nworld,4.5\n").unwrap();

    let facade = SpreadsheetFacade::new();
    let doc = facade.acquire(Some(&path)).unwrap();
    assert_eq!(doc.sheet_names(), vec!["Sheet1".to_string()]);

    let sheet = doc.sheet("Sheet1").unwrap();
    assert_eq!(
        sheet.cell(1, 1),
        Some(&CellValue::Text("hello".to_string()))
    );
    assert_eq!(sheet.cell(1, 2), Some(&CellValue::Int(2)));
    assert_eq!(sheet.cell(2, 2), Some(&CellValue::Number(4.5)));
}

#[test]
fn acquire_tsv_path_splits_on_tabs() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("data.tsv");
    std::fs::write(&path, "a\tb\n1\t2\n").unwrap();

    let facade = SpreadsheetFacade::new();
    let doc = facade.acquire(Some(&path)).unwrap();
    let sheet = doc.sheet("Sheet1").unwrap();
    assert_eq!(sheet.dimensions(), Some((2, 2)));
    assert_eq!(sheet.cell(1, 1), Some(&CellValue::Text("a".to_string())));
    assert_eq!(sheet.cell(1, 2), Some(&CellValue::Text("b".to_string())));
    assert_eq!(sheet.cell(2, 2), Some(&CellValue::Int(2)));
}

#[test]
fn acquire_missing_path_is_load_error() {
    let facade = SpreadsheetFacade::new();
    let err = facade
        .acquire(Some(std::path::Path::new("/nonexistent/book.csv")))
        .unwrap_err();
    assert!(matches!(err, FacadeError::Load { .. }), "got {err:?}");
}

#[test]
fn acquire_undetectable_content_is_load_error() {
    let tmp = tempfile::tempdir().unwrap();
    // No known extension, non-ASCII leading bytes.
    let path = tmp.path().join("blob.bin");
    std::fs::write(&path, [0x00u8, 0xff, 0x00, 0xff]).unwrap();

    let facade = SpreadsheetFacade::new();
    let err = facade.acquire(Some(&path)).unwrap_err();
    assert!(matches!(err, FacadeError::Load { .. }), "got {err:?}");
}

#[test]
fn resolve_reader_requires_exact_tag() {
    let facade = SpreadsheetFacade::new();

    let reader = facade.resolve_reader("Csv").unwrap();
    assert_eq!(reader.format(), FormatType::Csv);

    for tag in ["csv", "CSV", "Parquet", ""] {
        let err = facade.resolve_reader(tag).unwrap_err();
        match err {
            FacadeError::UnsupportedFormat { format, role } => {
                assert_eq!(format, tag);
                assert_eq!(role, CodecRole::Reader);
            }
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }
}

#[test]
fn resolve_writer_is_lenient_about_spelling() {
    let facade = SpreadsheetFacade::new();
    let doc = Document::new();

    for tag in ["Csv", "csv", "CSV"] {
        let writer = facade.resolve_writer(&doc, tag).unwrap();
        assert_eq!(writer.format(), FormatType::Csv);
    }
}

#[test]
fn resolve_writer_rejects_formats_without_a_writer() {
    let facade = SpreadsheetFacade::new();
    let doc = Document::new();

    // Ods resolves to a known format tag but has no registered serializer.
    for tag in ["Ods", "Xlsb", "Xls", "Nope"] {
        let err = facade.resolve_writer(&doc, tag).unwrap_err();
        assert!(
            matches!(err, FacadeError::UnsupportedFormat { role: CodecRole::Writer, .. }),
            "tag {tag}: got {err:?}"
        );
    }
}

#[test]
fn bound_writer_saves_to_bytes_and_path() {
    let facade = SpreadsheetFacade::new();
    let mut doc = Document::new();
    doc.add_sheet("Sheet1").set_cell(1, 1, "hello");

    let writer = facade.resolve_writer(&doc, "Csv").unwrap();
    let bytes = writer.save_to(SaveDestination::Bytes).unwrap().unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap(), "hello\n");

    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("out.csv");
    assert!(writer.save_to(SaveDestination::Path(&path)).unwrap().is_none());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
}

#[test]
fn reader_resolution_reads_bytes() {
    let facade = SpreadsheetFacade::new();
    let reader = facade.resolve_reader("Csv").unwrap();
    let doc = reader.read_bytes(b"a,b\n1,2\n").unwrap();
    let sheet = doc.sheet("Sheet1").unwrap();
    assert_eq!(sheet.dimensions(), Some((2, 2)));
    assert_eq!(sheet.cell(2, 1), Some(&CellValue::Int(1)));
}
