//! Form-urlencoded message converter.

use std::any::{Any, TypeId};

use bytes::Bytes;
use url::form_urlencoded;

use crate::converter::{supports_media, InboundMessage, MessageConverter, OutboundMessage};
use crate::error::ConversionError;
use crate::media::MediaType;

/// Converts `Vec<(String, String)>` pairs to and from
/// `application/x-www-form-urlencoded`, preserving pair order.
pub struct FormConverter {
    supported: Vec<MediaType>,
}

impl FormConverter {
    /// Converter supporting `application/x-www-form-urlencoded`.
    pub fn new() -> Self {
        FormConverter {
            supported: vec![MediaType::form_urlencoded()],
        }
    }
}

impl Default for FormConverter {
    fn default() -> Self {
        FormConverter::new()
    }
}

impl MessageConverter for FormConverter {
    fn can_read(&self, target: TypeId, media_type: Option<&MediaType>) -> bool {
        target == TypeId::of::<Vec<(String, String)>>()
            && supports_media(&self.supported, media_type)
    }

    fn can_write(&self, source: TypeId, media_type: Option<&MediaType>) -> bool {
        source == TypeId::of::<Vec<(String, String)>>()
            && supports_media(&self.supported, media_type)
    }

    fn supported_media_types(&self) -> Vec<MediaType> {
        self.supported.clone()
    }

    fn read(
        &self,
        _target: TypeId,
        message: InboundMessage<'_>,
    ) -> Result<Box<dyn Any + Send>, ConversionError> {
        let pairs: Vec<(String, String)> = form_urlencoded::parse(message.body)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Ok(Box::new(pairs))
    }

    fn write(
        &self,
        value: &dyn Any,
        _media_type: Option<&MediaType>,
    ) -> Result<OutboundMessage, ConversionError> {
        let pairs = value
            .downcast_ref::<Vec<(String, String)>>()
            .ok_or_else(|| ConversionError::new("form converter given a non-pair-list value"))?;
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, val) in pairs {
            serializer.append_pair(name, val);
        }
        Ok(OutboundMessage {
            content_type: Some(MediaType::form_urlencoded()),
            body: Bytes::from(serializer.finish().into_bytes()),
        })
    }
}
