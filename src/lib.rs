//! Stateless facade over pluggable spreadsheet codecs.
//!
//! Three independent responsibilities, each a single-shot call:
//!
//! - **Document acquisition** — [`SpreadsheetFacade::acquire`] returns a
//!   fresh empty [`Document`] or loads one from disk with automatic format
//!   detection.
//! - **Codec resolution** — [`SpreadsheetFacade::resolve_reader`] (exact tag
//!   match) and [`SpreadsheetFacade::resolve_writer`] (lenient tag match)
//!   look codecs up in a closed [`FormatType`] registry.
//! - **Deferred streaming** — [`SpreadsheetFacade::stream_response`] builds a
//!   [`StreamedResponse`] whose body serializes the document directly into
//!   the transport sink, at most once, only when the transport asks for it.
//!
//! Backends are feature-gated: `csv` and `json` for the text formats,
//! `calamine` for reading the binary/XML workbook family, `umya` for
//! writing XLSX. All are enabled by default.

pub mod backends;
pub mod document;
pub mod error;
pub mod facade;
pub mod format;
pub mod response;
pub mod traits;

#[cfg(feature = "calamine")]
pub use backends::CalamineCodec;
#[cfg(feature = "csv")]
pub use backends::CsvCodec;
#[cfg(feature = "json")]
pub use backends::JsonCodec;
#[cfg(feature = "umya")]
pub use backends::XlsxCodec;
#[cfg(feature = "csv")]
pub use backends::csv::{
    CsvNewline, CsvQuoteStyle, CsvReadOptions, CsvTrim, CsvTypeInference, CsvWriteOptions,
};
pub use document::{CellValue, Document, Sheet};
pub use error::{CodecRole, FacadeError};
pub use facade::{BoundWriter, SpreadsheetFacade};
pub use format::FormatType;
pub use response::StreamedResponse;
pub use traits::{DocumentReader, DocumentWriter, SaveDestination};
