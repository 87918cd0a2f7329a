//! Plain-text message converter.

use std::any::{Any, TypeId};

use bytes::Bytes;

use crate::converter::{supports_media, InboundMessage, MessageConverter, OutboundMessage};
use crate::error::ConversionError;
use crate::media::MediaType;

/// Converts `String` to and from `text/plain`.
///
/// Reads honour the response charset parameter; only UTF-8 (and its subset
/// US-ASCII) is supported, which is also what gets written.
pub struct TextConverter {
    supported: Vec<MediaType>,
}

impl TextConverter {
    /// Converter supporting `text/plain`.
    pub fn new() -> Self {
        TextConverter {
            supported: vec![MediaType::text_plain()],
        }
    }
}

impl Default for TextConverter {
    fn default() -> Self {
        TextConverter::new()
    }
}

impl MessageConverter for TextConverter {
    fn can_read(&self, target: TypeId, media_type: Option<&MediaType>) -> bool {
        target == TypeId::of::<String>() && supports_media(&self.supported, media_type)
    }

    fn can_write(&self, source: TypeId, media_type: Option<&MediaType>) -> bool {
        source == TypeId::of::<String>() && supports_media(&self.supported, media_type)
    }

    fn supported_media_types(&self) -> Vec<MediaType> {
        self.supported.clone()
    }

    fn read(
        &self,
        _target: TypeId,
        message: InboundMessage<'_>,
    ) -> Result<Box<dyn Any + Send>, ConversionError> {
        if let Some(charset) = message.content_type.and_then(MediaType::charset) {
            if !charset.eq_ignore_ascii_case("utf-8") && !charset.eq_ignore_ascii_case("us-ascii")
            {
                return Err(ConversionError::new(format!(
                    "unsupported charset '{charset}'"
                )));
            }
        }
        let text = String::from_utf8(message.body.to_vec())
            .map_err(|e| ConversionError::with_source("response body is not valid UTF-8", e))?;
        Ok(Box::new(text))
    }

    fn write(
        &self,
        value: &dyn Any,
        _media_type: Option<&MediaType>,
    ) -> Result<OutboundMessage, ConversionError> {
        let text = value
            .downcast_ref::<String>()
            .ok_or_else(|| ConversionError::new("text converter given a non-String value"))?;
        Ok(OutboundMessage {
            content_type: Some(MediaType::text_plain().with_parameter("charset", "utf-8")),
            body: Bytes::from(text.clone().into_bytes()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderMap;

    fn message<'a>(
        content_type: Option<&'a MediaType>,
        headers: &'a HeaderMap,
        body: &'a [u8],
    ) -> InboundMessage<'a> {
        InboundMessage {
            content_type,
            headers,
            body,
        }
    }

    #[test]
    fn reads_utf8_text() {
        let headers = HeaderMap::new();
        let mt = MediaType::text_plain();
        let value = TextConverter::new()
            .read(
                TypeId::of::<String>(),
                message(Some(&mt), &headers, b"Hello World"),
            )
            .unwrap();
        assert_eq!(*value.downcast::<String>().unwrap(), "Hello World");
    }

    #[test]
    fn rejects_unknown_charset() {
        let headers = HeaderMap::new();
        let mt = MediaType::text_plain().with_parameter("charset", "iso-8859-1");
        let result = TextConverter::new().read(
            TypeId::of::<String>(),
            message(Some(&mt), &headers, b"hi"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_invalid_utf8() {
        let headers = HeaderMap::new();
        let result = TextConverter::new().read(
            TypeId::of::<String>(),
            message(None, &headers, &[0xff, 0xfe]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn write_read_round_trip() {
        let converter = TextConverter::new();
        let original = "round and round".to_string();

        let out = converter.write(&original, None).unwrap();
        assert_eq!(
            out.content_type,
            Some(MediaType::text_plain().with_parameter("charset", "utf-8"))
        );

        let headers = HeaderMap::new();
        let back = converter
            .read(
                TypeId::of::<String>(),
                message(out.content_type.as_ref(), &headers, &out.body),
            )
            .unwrap();
        assert_eq!(*back.downcast::<String>().unwrap(), original);
    }

    #[test]
    fn capability_predicates() {
        let converter = TextConverter::new();
        let string = TypeId::of::<String>();
        assert!(converter.can_read(string, None));
        assert!(converter.can_read(string, Some(&MediaType::text_plain())));
        assert!(!converter.can_read(string, Some(&MediaType::application_json())));
        assert!(!converter.can_read(TypeId::of::<Vec<u8>>(), None));
        assert!(converter.can_write(string, Some(&MediaType::text_plain())));
    }
}
