use std::io::Write;
use std::path::Path;
use std::time::Instant;

use crate::document::Document;
use crate::error::{CodecRole, FacadeError};
use crate::format::FormatType;
use crate::response::StreamedResponse;
use crate::traits::{DocumentReader, DocumentWriter, SaveDestination};

/// Stateless entry point for document acquisition, codec resolution and
/// streamed serialization.
///
/// The facade holds no state of its own; it is safe to share one instance
/// across concurrent request handlers, or to construct one per call.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpreadsheetFacade;

impl SpreadsheetFacade {
    pub fn new() -> Self {
        Self
    }

    /// Return a new empty document, or load one from `path` with automatic
    /// format detection.
    ///
    /// Every load failure — missing file, undetectable format, parse error —
    /// surfaces as [`FacadeError::Load`]; there is no local recovery.
    pub fn acquire(&self, path: Option<&Path>) -> Result<Document, FacadeError> {
        let Some(path) = path else {
            return Ok(Document::new());
        };
        let start = Instant::now();
        let format = FormatType::detect(path)?;
        let reader = reader_for_file(path, format)
            .ok_or_else(|| FacadeError::load(path, format!("no reader available for `{format}`")))?;
        let document = reader.read_path(path).map_err(|e| match e {
            load @ FacadeError::Load { .. } => load,
            other => FacadeError::load(path, other),
        })?;
        tracing::debug!(
            path = %path.display(),
            %format,
            sheets = document.sheet_count(),
            cells = document.cell_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "document loaded"
        );
        Ok(document)
    }

    /// Resolve a deserializer by its exact format tag (`"Xlsx"`, `"Csv"`, …).
    ///
    /// The lookup is deliberately strict: no aliases, no case folding. It is
    /// checked against the registry before any construction happens, so the
    /// failure is deterministic.
    pub fn resolve_reader(&self, tag: &str) -> Result<Box<dyn DocumentReader>, FacadeError> {
        let format = FormatType::from_name(tag)
            .ok_or_else(|| FacadeError::unsupported_format(tag, CodecRole::Reader))?;
        reader_for(format).ok_or_else(|| FacadeError::unsupported_format(tag, CodecRole::Reader))
    }

    /// Resolve a serializer bound to `document` for the given format tag.
    ///
    /// Unlike [`resolve_reader`](Self::resolve_reader), the tag resolution
    /// is lenient (case-insensitive, extension aliases).
    pub fn resolve_writer<'a>(
        &self,
        document: &'a Document,
        tag: &str,
    ) -> Result<BoundWriter<'a>, FacadeError> {
        let (format, codec) = resolve_writer_codec(tag)?;
        Ok(BoundWriter {
            document,
            format,
            codec,
        })
    }

    /// Build a [`StreamedResponse`] with status 200 and no extra headers.
    pub fn stream_response(
        &self,
        document: Document,
        tag: &str,
    ) -> Result<StreamedResponse, FacadeError> {
        self.stream_response_with(document, tag, 200, Vec::new())
    }

    /// Build a [`StreamedResponse`] serializing `document` as `tag`.
    ///
    /// Writer resolution happens here, so an unsupported format fails before
    /// any response object exists. The document is moved into the deferred
    /// body and serialized only when the transport consumes the response.
    pub fn stream_response_with(
        &self,
        document: Document,
        tag: &str,
        status: u16,
        headers: Vec<(String, String)>,
    ) -> Result<StreamedResponse, FacadeError> {
        let (format, codec) = resolve_writer_codec(tag)?;
        let body = Box::new(move |sink: &mut dyn Write| codec.write_to(&document, sink));
        Ok(StreamedResponse::new(format, status, headers, body))
    }
}

/// A serializer bound to a document and a format.
///
/// The binding is a borrow: the writer cannot outlive the document it
/// serializes, and the document stays immutable until the writer is dropped.
pub struct BoundWriter<'a> {
    document: &'a Document,
    format: FormatType,
    codec: Box<dyn DocumentWriter>,
}

impl std::fmt::Debug for BoundWriter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundWriter")
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl<'a> BoundWriter<'a> {
    pub fn format(&self) -> FormatType {
        self.format
    }

    /// Serialize into an arbitrary sink.
    pub fn write_to(&self, out: &mut dyn Write) -> Result<(), FacadeError> {
        self.codec.write_to(self.document, out)
    }

    /// Serialize to a path, writer, or in-memory buffer.
    pub fn save_to(&self, dest: SaveDestination<'_>) -> Result<Option<Vec<u8>>, FacadeError> {
        self.codec.save_to(self.document, dest)
    }
}

fn resolve_writer_codec(tag: &str) -> Result<(FormatType, Box<dyn DocumentWriter>), FacadeError> {
    let format = FormatType::parse_lenient(tag)
        .ok_or_else(|| FacadeError::unsupported_format(tag, CodecRole::Writer))?;
    let codec =
        writer_for(format).ok_or_else(|| FacadeError::unsupported_format(tag, CodecRole::Writer))?;
    Ok((format, codec))
}

/// File-aware reader lookup. Tab-separated files share the `Csv` tag but
/// need the tab-delimited codec preset; everything else goes straight to
/// the registry.
fn reader_for_file(path: &Path, format: FormatType) -> Option<Box<dyn DocumentReader>> {
    #[cfg(feature = "csv")]
    if format == FormatType::Csv
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("tsv"))
    {
        return Some(Box::new(crate::backends::CsvCodec::tsv()));
    }
    #[cfg(not(feature = "csv"))]
    let _ = path;
    reader_for(format)
}

/// Reader registry: a closed match over the format enum, validated by the
/// compiler instead of a runtime class lookup.
fn reader_for(format: FormatType) -> Option<Box<dyn DocumentReader>> {
    match format {
        #[cfg(feature = "csv")]
        FormatType::Csv => Some(Box::new(crate::backends::CsvCodec::new())),
        #[cfg(feature = "json")]
        FormatType::Json => Some(Box::new(crate::backends::JsonCodec::new())),
        #[cfg(feature = "calamine")]
        FormatType::Xlsx | FormatType::Xlsb | FormatType::Xls | FormatType::Ods => {
            Some(Box::new(crate::backends::CalamineCodec::new(format)))
        }
        #[cfg(all(feature = "umya", not(feature = "calamine")))]
        FormatType::Xlsx => Some(Box::new(crate::backends::XlsxCodec::new())),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

/// Writer registry. The OOXML binary formats and ODS have no writer; they
/// resolve to `None` and surface as `UnsupportedFormat`.
fn writer_for(format: FormatType) -> Option<Box<dyn DocumentWriter>> {
    match format {
        #[cfg(feature = "csv")]
        FormatType::Csv => Some(Box::new(crate::backends::CsvCodec::new())),
        #[cfg(feature = "json")]
        FormatType::Json => Some(Box::new(crate::backends::JsonCodec::new())),
        #[cfg(feature = "umya")]
        FormatType::Xlsx => Some(Box::new(crate::backends::XlsxCodec::new())),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}
