//! Error types and result handling.
//!
//! Every failure the client pipeline can produce is a [`RestError`] variant;
//! nothing is swallowed. The taxonomy separates transport failures (nothing
//! came back), status failures (a response came back and was classified as an
//! error), and conversion failures (the response could not be decoded or the
//! request body could not be encoded).
//!
//! Whatever the variant, the response handle for the call — if one was ever
//! produced — has been closed by the time the error reaches the caller.

use http::{HeaderMap, StatusCode};

use crate::media::MediaType;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RestError>;

/// Errors surfaced by [`RestClient`](crate::RestClient) operations.
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Connection, DNS, timeout, or stream failure before or during the
    /// exchange. Carries the underlying transport error as its source.
    #[error("transport failure: {source}")]
    Transport {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A response arrived but the error handler classified it as an error.
    /// No body was read; the original status and headers are attached.
    #[error("HTTP status {status}: {status_text}")]
    Status {
        /// The response status code.
        status: StatusCode,
        /// The status text accompanying the code.
        status_text: String,
        /// The response headers, for callers inspecting the failure.
        headers: HeaderMap,
    },

    /// No registered converter can decode the content type the server
    /// actually returned into the requested result type.
    #[error("no converter for response content type {}", .content_type.as_deref().unwrap_or("<none>"))]
    UnsupportedMediaType {
        /// The raw `Content-Type` value from the response, if any.
        content_type: Option<String>,
    },

    /// No registered converter can encode the outgoing value. Raised before
    /// any request is created.
    #[error("no converter can encode the request body")]
    NoConverterForWrite {
        /// The content type the caller asked for, if constrained.
        media_type: Option<MediaType>,
    },

    /// A converter's encode or decode step itself failed.
    #[error("message conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    /// The target address could not be parsed as an absolute URL.
    #[error("invalid address: {0}")]
    InvalidAddress(#[from] url::ParseError),
}

impl RestError {
    /// Wrap an arbitrary transport-level error.
    pub fn transport<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        RestError::Transport {
            source: Box::new(source),
        }
    }

    /// The response status code, for `Status` errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this is a `Status` error in the 4xx class.
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| s.is_client_error())
    }

    /// Whether this is a `Status` error in the 5xx class.
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| s.is_server_error())
    }
}

/// Failure inside a converter's encode or decode step.
///
/// Converters return this directly; the facade wraps it into
/// [`RestError::Conversion`].
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ConversionError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ConversionError {
    /// A conversion error with a message only.
    pub fn new(message: impl Into<String>) -> Self {
        ConversionError {
            message: message.into(),
            source: None,
        }
    }

    /// A conversion error wrapping an underlying cause.
    pub fn with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ConversionError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_accessors() {
        let err = RestError::Status {
            status: StatusCode::NOT_FOUND,
            status_text: "Not Found".to_string(),
            headers: HeaderMap::new(),
        };
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
    }

    #[test]
    fn non_status_errors_have_no_status() {
        let err = RestError::UnsupportedMediaType { content_type: None };
        assert_eq!(err.status(), None);
        assert!(!err.is_client_error());
    }

    #[test]
    fn display_includes_content_type() {
        let err = RestError::UnsupportedMediaType {
            content_type: Some("application/xml".to_string()),
        };
        assert!(err.to_string().contains("application/xml"));
    }

    #[test]
    fn conversion_error_keeps_source() {
        use std::error::Error as _;
        let inner = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad bytes");
        let err = ConversionError::with_source("decode failed", inner);
        assert_eq!(err.to_string(), "decode failed");
        assert!(err.source().is_some());
    }
}
