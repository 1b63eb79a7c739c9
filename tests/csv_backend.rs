#![cfg(feature = "csv")]

use sheetgate::backends::csv::{
    CsvCodec, CsvNewline, CsvReadOptions, CsvTypeInference, CsvWriteOptions,
};
use sheetgate::{CellValue, DocumentReader, DocumentWriter, SaveDestination};

#[test]
fn csv_roundtrip_simple() {
    let codec = CsvCodec::new();
    let doc = codec.read_bytes(b"1,2,hello\n3,4.5,FALSE\n").unwrap();

    let sheet = doc.sheet("Sheet1").unwrap();
    assert_eq!(sheet.dimensions(), Some((2, 3)));
    assert_eq!(sheet.cell(1, 1), Some(&CellValue::Int(1)));
    assert_eq!(sheet.cell(2, 2), Some(&CellValue::Number(4.5)));
    assert_eq!(sheet.cell(2, 3), Some(&CellValue::Boolean(false)));

    let out = codec.save_to(&doc, SaveDestination::Bytes).unwrap().unwrap();
    let doc2 = codec.read_bytes(&out).unwrap();
    assert_eq!(doc2, doc);
}

#[test]
fn csv_quotes_and_embedded_newlines() {
    let read_opts = CsvReadOptions {
        has_headers: true,
        type_inference: CsvTypeInference::Off,
        ..CsvReadOptions::default()
    };
    let codec = CsvCodec::with_options(read_opts, CsvWriteOptions::default());

    let input = b"A,B\n\"hello, world\",\"line1\nline2\"\n\"he said \"\"hi\"\"\",x\n";
    let doc = codec.read_bytes(input).unwrap();
    let sheet = doc.sheet("Sheet1").unwrap();

    assert_eq!(sheet.dimensions(), Some((3, 2)));
    assert_eq!(
        sheet.cell(2, 1),
        Some(&CellValue::Text("hello, world".to_string()))
    );
    assert_eq!(
        sheet.cell(2, 2),
        Some(&CellValue::Text("line1\nline2".to_string()))
    );
    assert_eq!(
        sheet.cell(3, 1),
        Some(&CellValue::Text("he said \"hi\"".to_string()))
    );

    // Re-reads exactly (headers already part of the grid on write).
    let out = codec.save_to(&doc, SaveDestination::Bytes).unwrap().unwrap();
    let codec2 = CsvCodec::with_options(
        CsvReadOptions {
            type_inference: CsvTypeInference::Off,
            ..CsvReadOptions::default()
        },
        CsvWriteOptions::default(),
    );
    let doc2 = codec2.read_bytes(&out).unwrap();
    assert_eq!(doc2, doc);
}

#[test]
fn csv_type_inference_modes() {
    // Basic: leading-zero strings stay text, unambiguous scalars convert.
    let doc = CsvCodec::new()
        .read_bytes(b"007,1.5,true,2024-03-01\n")
        .unwrap();
    let sheet = doc.sheet("Sheet1").unwrap();
    assert_eq!(sheet.cell(1, 1), Some(&CellValue::Text("007".to_string())));
    assert_eq!(sheet.cell(1, 2), Some(&CellValue::Number(1.5)));
    assert_eq!(sheet.cell(1, 3), Some(&CellValue::Boolean(true)));
    // Dates only parse under BasicWithDates.
    assert_eq!(
        sheet.cell(1, 4),
        Some(&CellValue::Text("2024-03-01".to_string()))
    );

    let codec = CsvCodec::with_options(
        CsvReadOptions {
            type_inference: CsvTypeInference::BasicWithDates,
            ..CsvReadOptions::default()
        },
        CsvWriteOptions::default(),
    );
    let doc = codec.read_bytes(b"2024-03-01,2024-03-01 12:00:00\n").unwrap();
    let sheet = doc.sheet("Sheet1").unwrap();
    assert_eq!(
        sheet.cell(1, 1),
        Some(&CellValue::Date(
            chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        ))
    );
    assert!(matches!(sheet.cell(1, 2), Some(CellValue::DateTime(_))));
}

#[test]
fn csv_ragged_rows_keep_sparse_cells() {
    let codec = CsvCodec::with_options(
        CsvReadOptions {
            type_inference: CsvTypeInference::Off,
            ..CsvReadOptions::default()
        },
        CsvWriteOptions::default(),
    );
    let doc = codec.read_bytes(b"a,b,c\n1,2\n3,4,5,6\n").unwrap();
    let sheet = doc.sheet("Sheet1").unwrap();

    assert_eq!(sheet.dimensions(), Some((3, 4)));
    assert_eq!(sheet.cell(2, 3), None);
    assert_eq!(sheet.cell(3, 4), Some(&CellValue::Text("6".to_string())));
}

#[test]
fn csv_crlf_output() {
    let codec = CsvCodec::with_options(
        CsvReadOptions::default(),
        CsvWriteOptions {
            newline: CsvNewline::Crlf,
            ..CsvWriteOptions::default()
        },
    );
    let mut doc = sheetgate::Document::new();
    let sheet = doc.add_sheet("Sheet1");
    sheet.set_cell(1, 1, "a");
    sheet.set_cell(2, 1, "b");

    let out = codec.save_to(&doc, SaveDestination::Bytes).unwrap().unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "a\r\nb\r\n");
}

#[test]
fn tsv_preset_round_trips_on_tabs() {
    let codec = CsvCodec::tsv();
    let doc = codec.read_bytes(b"a\tb\n1\t2\n").unwrap();
    let sheet = doc.sheet("Sheet1").unwrap();
    assert_eq!(sheet.dimensions(), Some((2, 2)));
    assert_eq!(sheet.cell(1, 2), Some(&CellValue::Text("b".to_string())));
    assert_eq!(sheet.cell(2, 1), Some(&CellValue::Int(1)));

    let out = codec.save_to(&doc, SaveDestination::Bytes).unwrap().unwrap();
    assert_eq!(codec.read_bytes(&out).unwrap(), doc);
}

#[test]
fn csv_numeric_inference_edges() {
    let doc = CsvCodec::new().read_bytes(b"+7,-0,1e3,0123,nan\n").unwrap();
    let sheet = doc.sheet("Sheet1").unwrap();
    assert_eq!(sheet.cell(1, 1), Some(&CellValue::Int(7)));
    assert_eq!(sheet.cell(1, 2), Some(&CellValue::Int(0)));
    assert_eq!(sheet.cell(1, 3), Some(&CellValue::Number(1000.0)));
    assert_eq!(sheet.cell(1, 4), Some(&CellValue::Text("0123".to_string())));
    assert_eq!(sheet.cell(1, 5), Some(&CellValue::Text("nan".to_string())));
}

#[test]
fn csv_cleared_sheet_serializes_to_nothing() {
    let codec = CsvCodec::new();
    let mut doc = sheetgate::Document::new();
    let sheet = doc.add_sheet("Sheet1");
    sheet.set_cell(3, 2, "x");
    sheet.set_cell(3, 2, CellValue::Empty);

    let out = codec.save_to(&doc, SaveDestination::Bytes).unwrap().unwrap();
    assert!(out.is_empty());
}

#[test]
fn csv_empty_document_serializes_to_nothing() {
    let codec = CsvCodec::new();
    let out = codec
        .save_to(&sheetgate::Document::new(), SaveDestination::Bytes)
        .unwrap()
        .unwrap();
    assert!(out.is_empty());
}

#[test]
fn csv_format_tag() {
    let codec = CsvCodec::new();
    assert_eq!(DocumentReader::format(&codec), sheetgate::FormatType::Csv);
    assert_eq!(DocumentWriter::format(&codec), sheetgate::FormatType::Csv);
}
