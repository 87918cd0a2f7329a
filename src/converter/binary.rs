//! Raw byte message converter.

use std::any::{Any, TypeId};

use bytes::Bytes;

use crate::converter::{InboundMessage, MessageConverter, OutboundMessage};
use crate::error::ConversionError;
use crate::media::MediaType;

/// Passes response bodies through as raw bytes.
///
/// Handles both [`Bytes`] and `Vec<u8>` targets and accepts any content
/// type: bytes are bytes. Advertises `application/octet-stream` first and
/// `*/*` as a fallback range.
pub struct BinaryConverter {
    supported: Vec<MediaType>,
}

impl BinaryConverter {
    /// Converter passing bodies through untouched.
    pub fn new() -> Self {
        BinaryConverter {
            supported: vec![MediaType::octet_stream(), MediaType::all()],
        }
    }

    fn handles(&self, ty: TypeId) -> bool {
        ty == TypeId::of::<Bytes>() || ty == TypeId::of::<Vec<u8>>()
    }
}

impl Default for BinaryConverter {
    fn default() -> Self {
        BinaryConverter::new()
    }
}

impl MessageConverter for BinaryConverter {
    fn can_read(&self, target: TypeId, _media_type: Option<&MediaType>) -> bool {
        self.handles(target)
    }

    fn can_write(&self, source: TypeId, _media_type: Option<&MediaType>) -> bool {
        self.handles(source)
    }

    fn supported_media_types(&self) -> Vec<MediaType> {
        self.supported.clone()
    }

    fn read(
        &self,
        target: TypeId,
        message: InboundMessage<'_>,
    ) -> Result<Box<dyn Any + Send>, ConversionError> {
        if target == TypeId::of::<Bytes>() {
            Ok(Box::new(Bytes::copy_from_slice(message.body)))
        } else if target == TypeId::of::<Vec<u8>>() {
            Ok(Box::new(message.body.to_vec()))
        } else {
            Err(ConversionError::new(
                "binary converter asked for a non-byte target",
            ))
        }
    }

    fn write(
        &self,
        value: &dyn Any,
        _media_type: Option<&MediaType>,
    ) -> Result<OutboundMessage, ConversionError> {
        let body = if let Some(bytes) = value.downcast_ref::<Bytes>() {
            bytes.clone()
        } else if let Some(vec) = value.downcast_ref::<Vec<u8>>() {
            Bytes::copy_from_slice(vec)
        } else {
            return Err(ConversionError::new(
                "binary converter given a non-byte value",
            ));
        };
        Ok(OutboundMessage {
            content_type: Some(MediaType::octet_stream()),
            body,
        })
    }
}
