//! Response entity value type.

use http::{header, HeaderMap, StatusCode};

use crate::media::MediaType;

/// The decoded result of an exchange: body, headers, and status.
///
/// Constructed once per successful call and immutable afterwards. The body is
/// `None` when the server returned no content.
///
/// # Examples
///
/// ```
/// use http::{HeaderMap, StatusCode};
/// use typed_rest::ResponseEntity;
///
/// let entity = ResponseEntity::new(
///     Some("Hello World".to_string()),
///     HeaderMap::new(),
///     StatusCode::OK,
/// );
/// assert_eq!(entity.body(), Some(&"Hello World".to_string()));
/// assert_eq!(entity.status(), StatusCode::OK);
/// ```
#[derive(Debug, Clone)]
pub struct ResponseEntity<T> {
    body: Option<T>,
    headers: HeaderMap,
    status: StatusCode,
}

impl<T> ResponseEntity<T> {
    /// Assemble an entity from its parts.
    pub fn new(body: Option<T>, headers: HeaderMap, status: StatusCode) -> Self {
        ResponseEntity {
            body,
            headers,
            status,
        }
    }

    /// The decoded body, if the response carried one.
    pub fn body(&self) -> Option<&T> {
        self.body.as_ref()
    }

    /// Consume the entity, yielding the body.
    pub fn into_body(self) -> Option<T> {
        self.body
    }

    /// The response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The response status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The parsed `Content-Type` header, if present and well-formed.
    pub fn content_type(&self) -> Option<MediaType> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| MediaType::parse(v).ok())
    }

    /// The `Content-Length` header, if present and numeric.
    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn accessors() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("11"));

        let entity = ResponseEntity::new(Some(42u32), headers, StatusCode::OK);
        assert_eq!(entity.body(), Some(&42));
        assert_eq!(entity.status(), StatusCode::OK);
        assert_eq!(entity.content_type(), Some(MediaType::text_plain()));
        assert_eq!(entity.content_length(), Some(11));
    }

    #[test]
    fn empty_body() {
        let entity: ResponseEntity<String> =
            ResponseEntity::new(None, HeaderMap::new(), StatusCode::NO_CONTENT);
        assert!(entity.body().is_none());
        assert!(entity.content_type().is_none());
        assert_eq!(entity.into_body(), None);
    }
}
