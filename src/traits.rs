use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::document::Document;
use crate::error::FacadeError;
use crate::format::FormatType;

/// Where a writer sends its output.
pub enum SaveDestination<'a> {
    /// Create/truncate the file at the given path.
    Path(&'a Path),
    /// Write into a caller-supplied sink.
    Writer(&'a mut dyn Write),
    /// Collect the serialized output into a buffer and return it.
    Bytes,
}

/// A deserializer for one format. Constructed with no arguments by the
/// registry; stateless per use.
pub trait DocumentReader: Send + Sync {
    fn format(&self) -> FormatType;

    fn read_path(&self, path: &Path) -> Result<Document, FacadeError>;

    fn read_bytes(&self, bytes: &[u8]) -> Result<Document, FacadeError>;
}

impl std::fmt::Debug for dyn DocumentReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentReader")
            .field("format", &self.format())
            .finish()
    }
}

/// A serializer for one format.
///
/// `write_to` streams directly into the sink; nothing buffers the full
/// output unless the caller asked for [`SaveDestination::Bytes`].
pub trait DocumentWriter: Send + Sync {
    fn format(&self) -> FormatType;

    fn write_to(&self, document: &Document, out: &mut dyn Write) -> Result<(), FacadeError>;

    fn save_to(
        &self,
        document: &Document,
        dest: SaveDestination<'_>,
    ) -> Result<Option<Vec<u8>>, FacadeError> {
        match dest {
            SaveDestination::Path(path) => {
                let mut file = File::create(path)?;
                self.write_to(document, &mut file)?;
                Ok(None)
            }
            SaveDestination::Writer(writer) => {
                self.write_to(document, writer)?;
                Ok(None)
            }
            SaveDestination::Bytes => {
                let mut buf: Vec<u8> = Vec::new();
                self.write_to(document, &mut buf)?;
                Ok(Some(buf))
            }
        }
    }
}
