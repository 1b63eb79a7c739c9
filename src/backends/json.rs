#![cfg(feature = "json")]

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::document::{CellValue, Document};
use crate::error::FacadeError;
use crate::format::FormatType;
use crate::traits::{DocumentReader, DocumentWriter};

const DATE_FMT: &str = "%Y-%m-%d";
const DATETIME_FMT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Serialize, Deserialize, Debug, Default)]
struct JsonWorkbook {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    sheets: Vec<JsonSheet>,
}

fn default_version() -> u32 {
    1
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct JsonSheet {
    name: String,
    #[serde(default)]
    cells: Vec<JsonCell>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dimensions: Option<(u32, u32)>,
}

#[derive(Serialize, Deserialize, Debug)]
struct JsonCell {
    row: u32,
    col: u32,
    value: JsonValue,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(tag = "type", content = "value")]
enum JsonValue {
    Int(i64),
    Number(f64),
    Text(String),
    Boolean(bool),
    Date(String),
    DateTime(String),
    Empty,
}

impl JsonValue {
    fn from_cell(v: &CellValue) -> Self {
        match v {
            CellValue::Empty => JsonValue::Empty,
            CellValue::Text(s) => JsonValue::Text(s.clone()),
            CellValue::Int(i) => JsonValue::Int(*i),
            CellValue::Number(n) => JsonValue::Number(*n),
            CellValue::Boolean(b) => JsonValue::Boolean(*b),
            CellValue::Date(d) => JsonValue::Date(d.format(DATE_FMT).to_string()),
            CellValue::DateTime(dt) => JsonValue::DateTime(dt.format(DATETIME_FMT).to_string()),
        }
    }

    fn into_cell(self) -> Result<CellValue, FacadeError> {
        Ok(match self {
            JsonValue::Empty => CellValue::Empty,
            JsonValue::Text(s) => CellValue::Text(s),
            JsonValue::Int(i) => CellValue::Int(i),
            JsonValue::Number(n) => CellValue::Number(n),
            JsonValue::Boolean(b) => CellValue::Boolean(b),
            JsonValue::Date(s) => CellValue::Date(
                chrono::NaiveDate::parse_from_str(&s, DATE_FMT)
                    .map_err(|e| FacadeError::from_backend("json", e))?,
            ),
            JsonValue::DateTime(s) => CellValue::DateTime(
                chrono::NaiveDateTime::parse_from_str(&s, DATETIME_FMT)
                    .map_err(|e| FacadeError::from_backend("json", e))?,
            ),
        })
    }
}

/// JSON codec for the facade's own workbook schema: a versioned envelope
/// with ordered sheets and sparse cell records.
#[derive(Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    fn from_schema(wb: JsonWorkbook) -> Result<Document, FacadeError> {
        let mut document = Document::new();
        for js in wb.sheets {
            let sheet = document.add_sheet(js.name);
            for cell in js.cells {
                if cell.row == 0 || cell.col == 0 {
                    return Err(FacadeError::Backend {
                        backend: "json".to_string(),
                        message: format!(
                            "cell coordinates are 1-based, got ({}, {})",
                            cell.row, cell.col
                        ),
                    });
                }
                sheet.set_cell(cell.row, cell.col, cell.value.into_cell()?);
            }
        }
        Ok(document)
    }

    fn to_schema(document: &Document) -> JsonWorkbook {
        JsonWorkbook {
            version: default_version(),
            sheets: document
                .sheets()
                .iter()
                .map(|sheet| JsonSheet {
                    name: sheet.name().to_string(),
                    dimensions: sheet.dimensions(),
                    cells: sheet
                        .cells()
                        .map(|((row, col), v)| JsonCell {
                            row,
                            col,
                            value: JsonValue::from_cell(v),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

impl DocumentReader for JsonCodec {
    fn format(&self) -> FormatType {
        FormatType::Json
    }

    fn read_path(&self, path: &Path) -> Result<Document, FacadeError> {
        let file = std::fs::File::open(path)?;
        let wb: JsonWorkbook = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| FacadeError::from_backend("json", e))?;
        Self::from_schema(wb)
    }

    fn read_bytes(&self, bytes: &[u8]) -> Result<Document, FacadeError> {
        let wb: JsonWorkbook =
            serde_json::from_slice(bytes).map_err(|e| FacadeError::from_backend("json", e))?;
        Self::from_schema(wb)
    }
}

impl DocumentWriter for JsonCodec {
    fn format(&self) -> FormatType {
        FormatType::Json
    }

    fn write_to(&self, document: &Document, out: &mut dyn Write) -> Result<(), FacadeError> {
        let wb = Self::to_schema(document);
        let result = if self.pretty {
            serde_json::to_writer_pretty(&mut *out, &wb)
        } else {
            serde_json::to_writer(&mut *out, &wb)
        };
        result.map_err(|e| FacadeError::from_backend("json", e))?;
        out.flush()?;
        Ok(())
    }
}
