#![cfg(feature = "umya")]

use std::io::Write;
use std::path::Path;

use umya_spreadsheet::{reader::xlsx, writer, CellRawValue, CellValue as UmyaCellValue};

use crate::document::{CellValue, Document};
use crate::error::FacadeError;
use crate::format::FormatType;
use crate::traits::{DocumentReader, DocumentWriter};

const BACKEND: &str = "umya";

/// XLSX codec backed by umya-spreadsheet.
///
/// This is the only writer for the OOXML family; reading from an in-memory
/// buffer goes through the calamine codec instead, which umya does not
/// support from its stable reader surface.
#[derive(Default)]
pub struct XlsxCodec;

impl XlsxCodec {
    pub fn new() -> Self {
        Self
    }

    fn convert_cell_value(cv: &UmyaCellValue) -> Option<CellValue> {
        let raw = cv.get_raw_value();
        if raw.is_empty() {
            return None;
        }
        if raw.is_error() {
            // Keep the error code as text; the document model carries no
            // spreadsheet-error variant.
            return Some(CellValue::Text(cv.get_value().to_string()));
        }
        match raw {
            CellRawValue::Numeric(n) => Some(CellValue::Number(*n)),
            CellRawValue::Bool(b) => Some(CellValue::Boolean(*b)),
            CellRawValue::String(s) => Some(CellValue::Text(s.to_string())),
            CellRawValue::RichText(rt) => Some(CellValue::Text(rt.get_text().to_string())),
            CellRawValue::Lazy(s) => {
                let txt = s.as_ref();
                if let Ok(n) = txt.parse::<f64>() {
                    Some(CellValue::Number(n))
                } else if txt.eq_ignore_ascii_case("TRUE") {
                    Some(CellValue::Boolean(true))
                } else if txt.eq_ignore_ascii_case("FALSE") {
                    Some(CellValue::Boolean(false))
                } else {
                    Some(CellValue::Text(txt.to_string()))
                }
            }
            CellRawValue::Error(_) => unreachable!(),
            CellRawValue::Empty => None,
        }
    }

    fn to_book(document: &Document) -> Result<umya_spreadsheet::Spreadsheet, FacadeError> {
        let mut book = umya_spreadsheet::new_file_empty_worksheet();
        if document.is_empty() {
            // XLSX packages require at least one worksheet.
            book.new_sheet("Sheet1")
                .map_err(|e| FacadeError::from_backend(BACKEND, e))?;
            return Ok(book);
        }
        for sheet in document.sheets() {
            let ws = book
                .new_sheet(sheet.name())
                .map_err(|e| FacadeError::from_backend(BACKEND, e))?;
            for ((row, col), value) in sheet.cells() {
                // umya addresses cells as (col, row)
                let cell = ws.get_cell_mut((col, row));
                match value {
                    CellValue::Number(n) => {
                        cell.set_value_number(*n);
                    }
                    CellValue::Int(i) => {
                        cell.set_value_number(*i as f64);
                    }
                    CellValue::Boolean(b) => {
                        cell.set_value_bool(*b);
                    }
                    CellValue::Text(s) => {
                        cell.set_value(s);
                    }
                    CellValue::Date(d) => {
                        cell.set_value(d.format("%Y-%m-%d").to_string());
                    }
                    CellValue::DateTime(dt) => {
                        cell.set_value(dt.format("%Y-%m-%dT%H:%M:%S").to_string());
                    }
                    CellValue::Empty => {
                        cell.set_blank();
                    }
                }
            }
        }
        Ok(book)
    }
}

impl DocumentReader for XlsxCodec {
    fn format(&self) -> FormatType {
        FormatType::Xlsx
    }

    fn read_path(&self, path: &Path) -> Result<Document, FacadeError> {
        let mut book =
            xlsx::read(path).map_err(|e| FacadeError::from_backend(BACKEND, e))?;
        let count = book.get_sheet_count();
        for i in 0..count {
            book.read_sheet(i);
        }

        let mut document = Document::new();
        for i in 0..count {
            let Some(ws) = book.get_sheet(&i) else {
                continue;
            };
            let name = ws.get_name().to_string();
            let mut cells = Vec::new();
            for cell in ws.get_cell_collection() {
                let coord = cell.get_coordinate();
                let row = *coord.get_row_num();
                let col = *coord.get_col_num();
                if let Some(v) = Self::convert_cell_value(cell.get_cell_value()) {
                    cells.push((row, col, v));
                }
            }
            let sheet = document.add_sheet(name);
            for (row, col, v) in cells {
                sheet.set_cell(row, col, v);
            }
        }
        Ok(document)
    }

    fn read_bytes(&self, _bytes: &[u8]) -> Result<Document, FacadeError> {
        Err(FacadeError::Unsupported {
            feature: "read_bytes".to_string(),
            context: "umya: use the calamine reader for in-memory input".to_string(),
        })
    }
}

impl DocumentWriter for XlsxCodec {
    fn format(&self) -> FormatType {
        FormatType::Xlsx
    }

    fn write_to(&self, document: &Document, out: &mut dyn Write) -> Result<(), FacadeError> {
        let book = Self::to_book(document)?;
        writer::xlsx::write_writer(&book, out)
            .map_err(|e| FacadeError::from_backend(BACKEND, e))
    }
}
