//! Response error classification.

use crate::transport::ClientResponse;

/// Strategy deciding whether a completed response represents a failure.
///
/// Invoked by the client immediately after the exchange, before any body is
/// read. Implementations only classify; the client raises the resulting
/// [`RestError::Status`](crate::RestError::Status) and closes the response
/// regardless of the verdict.
pub trait ResponseErrorHandler: Send + Sync {
    /// Whether `response` should be surfaced as an error.
    fn has_error(&self, response: &dyn ClientResponse) -> bool;
}

/// Default policy: any 4xx or 5xx status is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorHandler;

impl ResponseErrorHandler for DefaultErrorHandler {
    fn has_error(&self, response: &dyn ClientResponse) -> bool {
        let status = response.status();
        status.is_client_error() || status.is_server_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use http::{HeaderMap, StatusCode};

    struct FixedStatus {
        status: StatusCode,
        headers: HeaderMap,
    }

    impl FixedStatus {
        fn new(status: StatusCode) -> Self {
            FixedStatus {
                status,
                headers: HeaderMap::new(),
            }
        }
    }

    #[async_trait]
    impl ClientResponse for FixedStatus {
        fn status(&self) -> StatusCode {
            self.status
        }

        fn headers(&self) -> &HeaderMap {
            &self.headers
        }

        async fn body(&mut self) -> crate::error::Result<Bytes> {
            Ok(Bytes::new())
        }
    }

    #[test]
    fn default_handler_flags_4xx_and_5xx() {
        let handler = DefaultErrorHandler;
        assert!(!handler.has_error(&FixedStatus::new(StatusCode::OK)));
        assert!(!handler.has_error(&FixedStatus::new(StatusCode::NO_CONTENT)));
        assert!(!handler.has_error(&FixedStatus::new(StatusCode::MOVED_PERMANENTLY)));
        assert!(handler.has_error(&FixedStatus::new(StatusCode::NOT_FOUND)));
        assert!(handler.has_error(&FixedStatus::new(StatusCode::INTERNAL_SERVER_ERROR)));
    }

    #[test]
    fn custom_handler_can_relax_the_boundary() {
        // A handler that tolerates 404, e.g. for existence probes.
        struct NotFoundTolerant;
        impl ResponseErrorHandler for NotFoundTolerant {
            fn has_error(&self, response: &dyn ClientResponse) -> bool {
                let status = response.status();
                status != StatusCode::NOT_FOUND
                    && (status.is_client_error() || status.is_server_error())
            }
        }

        let handler = NotFoundTolerant;
        assert!(!handler.has_error(&FixedStatus::new(StatusCode::NOT_FOUND)));
        assert!(handler.has_error(&FixedStatus::new(StatusCode::BAD_REQUEST)));
    }
}
