//! Typed errors for the remote translation API.
//!
//! Every failed call is classified into an [`ErrorKind`] that decides
//! whether the request executor may retry it. Callers match on the kind;
//! the message and trace id are carried along for rendering.

use std::fmt;

/// Classification of a failed API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The API key was rejected (HTTP 403). Fatal.
    Authentication,
    /// The account's character quota is exhausted (HTTP 456). Fatal.
    Quota,
    /// Too many requests (HTTP 429). Retryable.
    RateLimit,
    /// The service is temporarily unavailable (HTTP 503 or other 5xx). Retryable.
    ServiceUnavailable,
    /// Connection failure, reset, or per-attempt timeout. Retryable.
    Network,
    /// A 200 response whose payload is missing expected fields. Fatal.
    Malformed,
    /// Anything else. Fatal.
    Unknown,
}

impl ErrorKind {
    /// Whether the executor may retry a failure of this kind.
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::RateLimit | Self::ServiceUnavailable | Self::Network
        )
    }

    /// Short label used when rendering errors.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Authentication => "authentication failed",
            Self::Quota => "quota exceeded",
            Self::RateLimit => "rate limited",
            Self::ServiceUnavailable => "service unavailable",
            Self::Network => "network error",
            Self::Malformed => "malformed response",
            Self::Unknown => "unexpected error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A classified failure from the remote translation service.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    /// What went wrong, in retry-relevant terms.
    pub kind: ErrorKind,
    /// Human-readable detail (status line, response body excerpt, ...).
    pub message: String,
    /// Diagnostic trace id returned by the service, when present.
    pub trace_id: Option<String>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            trace_id: None,
        }
    }

    /// Attaches a trace id unless one is already recorded.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: Option<String>) -> Self {
        if self.trace_id.is_none() {
            self.trace_id = trace_id;
        }
        self
    }

    /// Whether the executor may retry this failure.
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

/// Maps an HTTP status to an [`ErrorKind`].
///
/// Success statuses are never passed here; a 200 with a bad payload is
/// classified as [`ErrorKind::Malformed`] by the response parser instead.
pub fn classify_status(status: u16) -> ErrorKind {
    match status {
        403 => ErrorKind::Authentication,
        429 => ErrorKind::RateLimit,
        456 => ErrorKind::Quota,
        500..=599 => ErrorKind::ServiceUnavailable,
        _ => ErrorKind::Unknown,
    }
}

/// Classifies a transport-level failure from reqwest.
///
/// Timeouts and connection failures are retryable Network errors; anything
/// reqwest reports that is not transport-shaped falls through to Unknown.
pub fn classify_transport(err: &reqwest::Error) -> ErrorKind {
    if err.is_timeout() || err.is_connect() || err.is_request() {
        ErrorKind::Network
    } else if err.is_decode() {
        ErrorKind::Malformed
    } else {
        ErrorKind::Unknown
    }
}
