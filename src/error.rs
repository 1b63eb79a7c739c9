use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::format::FormatType;

/// Which side of a codec a format tag failed to resolve to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodecRole {
    Reader,
    Writer,
}

impl fmt::Display for CodecRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecRole::Reader => write!(f, "reader"),
            CodecRole::Writer => write!(f, "writer"),
        }
    }
}

/// Error type for facade operations.
///
/// Load / UnsupportedFormat / StreamWrite form the externally meaningful
/// taxonomy; the remaining variants carry backend and transport detail.
#[derive(Debug, Error)]
pub enum FacadeError {
    /// The source document could not be opened, read, or format-detected.
    #[error("failed to load document `{}`: {message}", path.display())]
    Load { path: PathBuf, message: String },

    /// The format tag has no registered codec for the requested role.
    #[error("no registered {role} for format `{format}`")]
    UnsupportedFormat { format: String, role: CodecRole },

    /// Serialization failed after the response body started streaming.
    ///
    /// By this point status and headers may already be on the wire, so the
    /// caller can only abort the transport; there is no recovery path.
    #[error("stream write failed for `{format}` response body: {message}")]
    StreamWrite {
        format: FormatType,
        message: String,
    },

    /// The deferred response body was invoked a second time.
    #[error("response body has already been streamed")]
    BodyConsumed,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A codec backend reported an error the facade has no richer mapping for.
    #[error("{backend}: {message}")]
    Backend { backend: String, message: String },

    /// Feature not supported by the codec that was asked to perform it.
    #[error("unsupported {feature} ({context})")]
    Unsupported { feature: String, context: String },
}

impl FacadeError {
    pub fn from_backend(backend: &str, err: impl fmt::Display) -> Self {
        FacadeError::Backend {
            backend: backend.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn load(path: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        FacadeError::Load {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn unsupported_format(tag: impl Into<String>, role: CodecRole) -> Self {
        FacadeError::UnsupportedFormat {
            format: tag.into(),
            role,
        }
    }
}
