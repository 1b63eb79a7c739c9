use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::FacadeError;

/// Closed registry of format tags the facade knows how to route.
///
/// Reader lookup (`from_name`) is an exact match on the canonical tag;
/// writer lookup goes through the friendlier [`FormatType::parse_lenient`].
/// The asymmetry is deliberate: callers resolving a reader name a concrete
/// codec, not an alias.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormatType {
    Xlsx,
    Xlsb,
    Xls,
    Ods,
    Csv,
    Json,
}

impl FormatType {
    pub const ALL: [FormatType; 6] = [
        FormatType::Xlsx,
        FormatType::Xlsb,
        FormatType::Xls,
        FormatType::Ods,
        FormatType::Csv,
        FormatType::Json,
    ];

    /// Canonical tag, e.g. `"Xlsx"`.
    pub fn name(&self) -> &'static str {
        match self {
            FormatType::Xlsx => "Xlsx",
            FormatType::Xlsb => "Xlsb",
            FormatType::Xls => "Xls",
            FormatType::Ods => "Ods",
            FormatType::Csv => "Csv",
            FormatType::Json => "Json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Xlsx => "xlsx",
            FormatType::Xlsb => "xlsb",
            FormatType::Xls => "xls",
            FormatType::Ods => "ods",
            FormatType::Csv => "csv",
            FormatType::Json => "json",
        }
    }

    /// MIME type used for the streamed response's default `Content-Type`.
    pub fn content_type(&self) -> &'static str {
        match self {
            FormatType::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            FormatType::Xlsb => "application/vnd.ms-excel.sheet.binary.macroEnabled.12",
            FormatType::Xls => "application/vnd.ms-excel",
            FormatType::Ods => "application/vnd.oasis.opendocument.spreadsheet",
            FormatType::Csv => "text/csv",
            FormatType::Json => "application/json",
        }
    }

    /// Exact-match lookup on the canonical tag.
    pub fn from_name(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == tag)
    }

    /// Case-insensitive lookup accepting canonical tags and extension
    /// spellings (`"xlsx"`, `"CSV"`, `"xlsm"`).
    pub fn parse_lenient(tag: &str) -> Option<Self> {
        if let Some(f) = Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(tag))
        {
            return Some(f);
        }
        Self::from_extension(&tag.to_ascii_lowercase())
    }

    /// Map a lowercase file extension to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "xlsx" | "xlsm" => Some(FormatType::Xlsx),
            "xlsb" => Some(FormatType::Xlsb),
            "xls" => Some(FormatType::Xls),
            "ods" => Some(FormatType::Ods),
            "csv" | "tsv" => Some(FormatType::Csv),
            "json" => Some(FormatType::Json),
            _ => None,
        }
    }

    /// Detect a file's format: extension first, leading-byte sniff as a
    /// fallback for unknown extensions.
    pub fn detect(path: &Path) -> Result<Self, FacadeError> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if let Some(format) = Self::from_extension(&ext) {
            return Ok(format);
        }

        let mut file = File::open(path).map_err(|e| FacadeError::load(path, e))?;
        let mut head = [0u8; 8];
        let n = file.read(&mut head).map_err(|e| FacadeError::load(path, e))?;
        sniff(&head[..n])
            .ok_or_else(|| FacadeError::load(path, "unable to detect spreadsheet format"))
    }
}

impl fmt::Display for FormatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Magic-byte sniff for files without a recognized extension.
///
/// Zip containers are assumed to be OOXML; distinguishing ODS would require
/// opening the archive's `mimetype` member, which the reader itself will
/// surface as a parse failure if the guess is wrong.
fn sniff(head: &[u8]) -> Option<FormatType> {
    const ZIP: &[u8] = b"PK\x03\x04";
    const CFB: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

    if head.starts_with(ZIP) {
        return Some(FormatType::Xlsx);
    }
    if head.len() >= 4 && head.starts_with(&CFB[..4]) {
        return Some(FormatType::Xls);
    }
    let trimmed = head.iter().position(|b| !b.is_ascii_whitespace());
    match trimmed.map(|i| head[i]) {
        Some(b'{') | Some(b'[') => Some(FormatType::Json),
        _ if head.iter().all(|b| b.is_ascii() && *b != 0) && !head.is_empty() => {
            Some(FormatType::Csv)
        }
        _ => None,
    }
}
