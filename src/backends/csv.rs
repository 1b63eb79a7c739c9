#![cfg(feature = "csv")]

use std::io::Write;
use std::path::Path;

use crate::document::{CellValue, Document, Sheet};
use crate::error::FacadeError;
use crate::format::FormatType;
use crate::traits::{DocumentReader, DocumentWriter};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CsvTrim {
    #[default]
    None,
    All,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CsvTypeInference {
    /// Do not infer: treat all non-empty fields as text.
    Off,
    /// Infer booleans + numbers when unambiguous.
    #[default]
    Basic,
    /// Like `Basic`, plus conservative ISO date/date-time parsing.
    BasicWithDates,
}

#[derive(Clone, Debug)]
pub struct CsvReadOptions {
    /// Field delimiter as a single byte. Use `b'\t'` for TSV.
    pub delimiter: u8,
    /// When true, the first record is treated as a header row. Headers are
    /// still loaded into row 1, but type inference is disabled for that row.
    pub has_headers: bool,
    pub trim: CsvTrim,
    pub type_inference: CsvTypeInference,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: false,
            trim: CsvTrim::None,
            type_inference: CsvTypeInference::Basic,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CsvNewline {
    #[default]
    Lf,
    Crlf,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CsvQuoteStyle {
    #[default]
    Necessary,
    Always,
    Never,
    NonNumeric,
}

#[derive(Clone, Debug)]
pub struct CsvWriteOptions {
    pub delimiter: u8,
    pub newline: CsvNewline,
    pub quote_style: CsvQuoteStyle,
}

impl Default for CsvWriteOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            newline: CsvNewline::Lf,
            quote_style: CsvQuoteStyle::Necessary,
        }
    }
}

/// CSV codec.
///
/// Semantics:
/// - A CSV file reads as a single-sheet document (sheet name `Sheet1`).
/// - UTF-8 only.
/// - Writing serializes the document's first sheet; CSV has no notion of
///   additional sheets and they are not representable in the output.
pub struct CsvCodec {
    read_options: CsvReadOptions,
    write_options: CsvWriteOptions,
}

impl Default for CsvCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvCodec {
    pub const SHEET_NAME: &'static str = "Sheet1";

    pub fn new() -> Self {
        Self::with_options(CsvReadOptions::default(), CsvWriteOptions::default())
    }

    /// Codec preset for tab-separated files: same semantics, tab delimiter
    /// on both the read and write side.
    pub fn tsv() -> Self {
        Self::with_options(
            CsvReadOptions {
                delimiter: b'\t',
                ..CsvReadOptions::default()
            },
            CsvWriteOptions {
                delimiter: b'\t',
                ..CsvWriteOptions::default()
            },
        )
    }

    pub fn with_options(read_options: CsvReadOptions, write_options: CsvWriteOptions) -> Self {
        Self {
            read_options,
            write_options,
        }
    }

    pub fn read_options(&self) -> &CsvReadOptions {
        &self.read_options
    }

    pub fn write_options(&self) -> &CsvWriteOptions {
        &self.write_options
    }

    fn read_from(&self, input: impl std::io::Read) -> Result<Document, FacadeError> {
        let mut rb = csv::ReaderBuilder::new();
        rb.delimiter(self.read_options.delimiter)
            .has_headers(self.read_options.has_headers)
            // Allow ragged rows; missing cells are simply absent.
            .flexible(true);
        match self.read_options.trim {
            CsvTrim::None => rb.trim(csv::Trim::None),
            CsvTrim::All => rb.trim(csv::Trim::All),
        };
        let mut rdr = rb.from_reader(input);

        let mut document = Document::new();
        let sheet = document.add_sheet(Self::SHEET_NAME);
        let mut row: u32 = 1;

        if self.read_options.has_headers {
            let headers = rdr
                .headers()
                .map_err(|e| FacadeError::from_backend("csv", e))?;
            for (ci, field) in headers.iter().enumerate() {
                if let Some(v) = infer_field(field, CsvTypeInference::Off) {
                    sheet.set_cell(row, ci as u32 + 1, v);
                }
            }
            row += 1;
        }

        for rec in rdr.records() {
            let rec = rec.map_err(|e| FacadeError::from_backend("csv", e))?;
            for (ci, field) in rec.iter().enumerate() {
                if let Some(v) = infer_field(field, self.read_options.type_inference) {
                    sheet.set_cell(row, ci as u32 + 1, v);
                }
            }
            row += 1;
        }

        Ok(document)
    }

    fn write_sheet(&self, sheet: &Sheet, out: &mut dyn Write) -> Result<(), FacadeError> {
        let mut wb = csv::WriterBuilder::new();
        wb.delimiter(self.write_options.delimiter)
            .terminator(match self.write_options.newline {
                CsvNewline::Lf => csv::Terminator::Any(b'\n'),
                CsvNewline::Crlf => csv::Terminator::CRLF,
            })
            .quote_style(match self.write_options.quote_style {
                CsvQuoteStyle::Necessary => csv::QuoteStyle::Necessary,
                CsvQuoteStyle::Always => csv::QuoteStyle::Always,
                CsvQuoteStyle::Never => csv::QuoteStyle::Never,
                CsvQuoteStyle::NonNumeric => csv::QuoteStyle::NonNumeric,
            });
        let mut wtr = wb.from_writer(out);

        let Some((rows, cols)) = sheet.dimensions() else {
            // Nothing occupied: empty output.
            return wtr.flush().map_err(FacadeError::Io);
        };

        for r in 1..=rows {
            let mut record: Vec<String> = Vec::with_capacity(cols as usize);
            for c in 1..=cols {
                record.push(match sheet.cell(r, c) {
                    Some(v) => render_field(v),
                    None => String::new(),
                });
            }
            wtr.write_record(record)
                .map_err(|e| FacadeError::from_backend("csv", e))?;
        }
        wtr.flush().map_err(FacadeError::Io)
    }
}

impl DocumentReader for CsvCodec {
    fn format(&self) -> FormatType {
        FormatType::Csv
    }

    fn read_path(&self, path: &Path) -> Result<Document, FacadeError> {
        let file = std::fs::File::open(path)?;
        self.read_from(std::io::BufReader::new(file))
    }

    fn read_bytes(&self, bytes: &[u8]) -> Result<Document, FacadeError> {
        self.read_from(bytes)
    }
}

impl DocumentWriter for CsvCodec {
    fn format(&self) -> FormatType {
        FormatType::Csv
    }

    fn write_to(&self, document: &Document, out: &mut dyn Write) -> Result<(), FacadeError> {
        match document.sheets().first() {
            Some(sheet) => self.write_sheet(sheet, out),
            // Zero-sheet document serializes to nothing.
            None => Ok(()),
        }
    }
}

fn infer_field(field: &str, mode: CsvTypeInference) -> Option<CellValue> {
    if field.is_empty() {
        return None;
    }
    if mode == CsvTypeInference::Off {
        return Some(CellValue::Text(field.to_string()));
    }

    if field.eq_ignore_ascii_case("true") {
        return Some(CellValue::Boolean(true));
    }
    if field.eq_ignore_ascii_case("false") {
        return Some(CellValue::Boolean(false));
    }
    if let Some(i) = parse_int_strict(field) {
        return Some(CellValue::Int(i));
    }
    if let Some(n) = parse_float_strict(field) {
        return Some(CellValue::Number(n));
    }
    if mode == CsvTypeInference::BasicWithDates {
        if let Some(d) = parse_date(field) {
            return Some(CellValue::Date(d));
        }
        if let Some(dt) = parse_datetime(field) {
            return Some(CellValue::DateTime(dt));
        }
    }
    Some(CellValue::Text(field.to_string()))
}

/// Leading zeros ("007") stay text: they usually mean an identifier, not a
/// number.
fn parse_int_strict(s: &str) -> Option<i64> {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    s.parse().ok()
}

/// Only fields that visibly look like floats (decimal point or exponent)
/// are considered; bare digit runs belong to the integer rule.
fn parse_float_strict(s: &str) -> Option<f64> {
    if !s.contains(['.', 'e', 'E']) {
        return None;
    }
    s.parse().ok().filter(|n: &f64| n.is_finite())
}

fn parse_date(s: &str) -> Option<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn parse_datetime(s: &str) -> Option<chrono::NaiveDateTime> {
    const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
    FORMATS
        .iter()
        .find_map(|f| chrono::NaiveDateTime::parse_from_str(s, f).ok())
}

fn render_field(v: &CellValue) -> String {
    match v {
        CellValue::Empty => String::new(),
        CellValue::Text(s) => s.clone(),
        CellValue::Int(i) => i.to_string(),
        CellValue::Number(n) => n.to_string(),
        CellValue::Boolean(b) => {
            if *b {
                "TRUE".to_string()
            } else {
                "FALSE".to_string()
            }
        }
        CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}
