#![cfg(feature = "calamine")]

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook, Data, Ods, Range, Reader, Xls, Xlsb, Xlsx};

use crate::document::{CellValue, Document};
use crate::error::FacadeError;
use crate::format::FormatType;
use crate::traits::DocumentReader;

const BACKEND: &str = "calamine";

/// Read-only codec over calamine's typed workbook readers.
///
/// One instance is bound to a single format tag; `Xlsx`, `Xlsb`, `Xls` and
/// `Ods` each open through the matching calamine reader rather than the
/// auto-detecting one, so a mismatched file fails instead of silently
/// parsing as something else.
pub struct CalamineCodec {
    format: FormatType,
}

impl CalamineCodec {
    /// `format` must be one of the calamine-backed tags.
    pub fn new(format: FormatType) -> Self {
        debug_assert!(
            matches!(
                format,
                FormatType::Xlsx | FormatType::Xlsb | FormatType::Xls | FormatType::Ods
            ),
            "not a calamine-backed format: {format}"
        );
        Self { format }
    }

    fn convert_value(data: &Data) -> Option<CellValue> {
        match data {
            Data::Empty => None,
            // Treat empty strings as no value.
            Data::String(s) if s.is_empty() => None,
            Data::String(s) => Some(CellValue::Text(s.clone())),
            Data::Float(f) => Some(CellValue::Number(*f)),
            Data::Int(i) => Some(CellValue::Int(*i)),
            Data::Bool(b) => Some(CellValue::Boolean(*b)),
            // Keep the error code as text.
            Data::Error(e) => Some(CellValue::Text(format!("{e}"))),
            // Excel serial number; the facade does not re-derive calendar
            // dates from workbook epoch settings.
            Data::DateTime(dt) => Some(CellValue::Number(dt.as_f64())),
            Data::DateTimeIso(s) => Some(CellValue::Text(s.clone())),
            Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
        }
    }

    fn collect_range(document: &mut Document, name: &str, range: &Range<Data>) {
        let sheet = document.add_sheet(name);
        let start_row = range.start().unwrap_or_default().0;
        let start_col = range.start().unwrap_or_default().1;
        for (row, col, data) in range.used_cells() {
            if let Some(v) = Self::convert_value(data) {
                // calamine is 0-based; document cells are 1-based.
                let excel_row = row as u32 + start_row + 1;
                let excel_col = col as u32 + start_col + 1;
                sheet.set_cell(excel_row, excel_col, v);
            }
        }
    }

    fn collect<RS, R>(mut wb: R) -> Result<Document, FacadeError>
    where
        RS: Read + Seek,
        R: Reader<RS>,
        R::Error: std::fmt::Display,
    {
        let mut document = Document::new();
        for name in wb.sheet_names().to_vec() {
            let range = wb
                .worksheet_range(&name)
                .map_err(|e| FacadeError::from_backend(BACKEND, e))?;
            Self::collect_range(&mut document, &name, &range);
        }
        Ok(document)
    }
}

impl DocumentReader for CalamineCodec {
    fn format(&self) -> FormatType {
        self.format
    }

    fn read_path(&self, path: &Path) -> Result<Document, FacadeError> {
        match self.format {
            FormatType::Xlsx => {
                let wb: Xlsx<BufReader<File>> =
                    open_workbook(path).map_err(|e| FacadeError::from_backend(BACKEND, e))?;
                Self::collect(wb)
            }
            FormatType::Xlsb => {
                let wb: Xlsb<BufReader<File>> =
                    open_workbook(path).map_err(|e| FacadeError::from_backend(BACKEND, e))?;
                Self::collect(wb)
            }
            FormatType::Xls => {
                let wb: Xls<BufReader<File>> =
                    open_workbook(path).map_err(|e| FacadeError::from_backend(BACKEND, e))?;
                Self::collect(wb)
            }
            FormatType::Ods => {
                let wb: Ods<BufReader<File>> =
                    open_workbook(path).map_err(|e| FacadeError::from_backend(BACKEND, e))?;
                Self::collect(wb)
            }
            other => Err(FacadeError::from_backend(
                BACKEND,
                format!("not a calamine-backed format: {other}"),
            )),
        }
    }

    fn read_bytes(&self, bytes: &[u8]) -> Result<Document, FacadeError> {
        let cursor = Cursor::new(bytes);
        match self.format {
            FormatType::Xlsx => {
                let wb = Xlsx::new(cursor).map_err(|e| FacadeError::from_backend(BACKEND, e))?;
                Self::collect(wb)
            }
            FormatType::Xlsb => {
                let wb = Xlsb::new(cursor).map_err(|e| FacadeError::from_backend(BACKEND, e))?;
                Self::collect(wb)
            }
            FormatType::Xls => {
                let wb = Xls::new(cursor).map_err(|e| FacadeError::from_backend(BACKEND, e))?;
                Self::collect(wb)
            }
            FormatType::Ods => {
                let wb = Ods::new(cursor).map_err(|e| FacadeError::from_backend(BACKEND, e))?;
                Self::collect(wb)
            }
            other => Err(FacadeError::from_backend(
                BACKEND,
                format!("not a calamine-backed format: {other}"),
            )),
        }
    }
}
