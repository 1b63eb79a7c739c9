use std::io::Write;

use crate::error::FacadeError;
use crate::format::FormatType;

pub(crate) type BodyFn = Box<dyn FnOnce(&mut dyn Write) -> Result<(), FacadeError> + Send>;

/// An HTTP-style response whose body is produced on demand.
///
/// Construction is side-effect free: the serializer has been resolved but
/// nothing has been written. The body runs when the transport calls
/// [`StreamedResponse::stream_to`], writing directly into the supplied sink
/// so peak memory stays at the serializer's working set instead of the full
/// output size.
///
/// The body is consumable at most once. A second `stream_to` call fails with
/// [`FacadeError::BodyConsumed`] instead of re-serializing.
pub struct StreamedResponse {
    status: u16,
    headers: Vec<(String, String)>,
    format: FormatType,
    body: Option<BodyFn>,
}

impl StreamedResponse {
    pub(crate) fn new(
        format: FormatType,
        status: u16,
        mut headers: Vec<(String, String)>,
        body: BodyFn,
    ) -> Self {
        if !headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case("Content-Type"))
        {
            headers.push(("Content-Type".to_string(), format.content_type().to_string()));
        }
        Self {
            status,
            headers,
            format,
            body: Some(body),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn format(&self) -> FormatType {
        self.format
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Case-insensitive header lookup, first match wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether the deferred body has already run.
    pub fn is_consumed(&self) -> bool {
        self.body.is_none()
    }

    /// Run the deferred serialization, writing the body into `sink`.
    ///
    /// Failures here are [`FacadeError::StreamWrite`]: by the time they
    /// occur status and headers may already be committed, so the caller's
    /// only option is to abort or truncate the transport.
    pub fn stream_to(&mut self, sink: &mut dyn Write) -> Result<(), FacadeError> {
        let body = self.body.take().ok_or(FacadeError::BodyConsumed)?;
        body(sink).map_err(|e| {
            tracing::warn!(
                format = %self.format,
                status = self.status,
                error = %e,
                "response body serialization failed mid-stream"
            );
            FacadeError::StreamWrite {
                format: self.format,
                message: e.to_string(),
            }
        })
    }
}

impl std::fmt::Debug for StreamedResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamedResponse")
            .field("status", &self.status)
            .field("format", &self.format)
            .field("headers", &self.headers)
            .field("consumed", &self.is_consumed())
            .finish()
    }
}
