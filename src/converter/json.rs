//! JSON message converter over serde types.

use std::any::{Any, TypeId};
use std::marker::PhantomData;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::converter::{supports_media, InboundMessage, MessageConverter, OutboundMessage};
use crate::error::ConversionError;
use crate::media::MediaType;

/// Converts one serde-capable type to and from `application/json`.
///
/// One instance handles exactly one payload type; register an instance per
/// type exchanged as JSON:
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use typed_rest::converter::{ConverterRegistry, JsonConverter, TextConverter};
///
/// #[derive(Serialize, Deserialize)]
/// struct Account {
///     name: String,
/// }
///
/// let registry = ConverterRegistry::new(vec![
///     Box::new(TextConverter::new()),
///     Box::new(JsonConverter::<Account>::new()),
/// ]);
/// ```
pub struct JsonConverter<T> {
    supported: Vec<MediaType>,
    _payload: PhantomData<fn() -> T>,
}

impl<T> JsonConverter<T> {
    /// Converter handling `T` as `application/json`.
    pub fn new() -> Self {
        JsonConverter {
            supported: vec![MediaType::application_json()],
            _payload: PhantomData,
        }
    }
}

impl<T> Default for JsonConverter<T> {
    fn default() -> Self {
        JsonConverter::new()
    }
}

impl<T> MessageConverter for JsonConverter<T>
where
    T: Serialize + DeserializeOwned + Send + 'static,
{
    fn can_read(&self, target: TypeId, media_type: Option<&MediaType>) -> bool {
        target == TypeId::of::<T>() && supports_media(&self.supported, media_type)
    }

    fn can_write(&self, source: TypeId, media_type: Option<&MediaType>) -> bool {
        source == TypeId::of::<T>() && supports_media(&self.supported, media_type)
    }

    fn supported_media_types(&self) -> Vec<MediaType> {
        self.supported.clone()
    }

    fn read(
        &self,
        _target: TypeId,
        message: InboundMessage<'_>,
    ) -> Result<Box<dyn Any + Send>, ConversionError> {
        let value: T = serde_json::from_slice(message.body)
            .map_err(|e| ConversionError::with_source("JSON deserialization failed", e))?;
        Ok(Box::new(value))
    }

    fn write(
        &self,
        value: &dyn Any,
        _media_type: Option<&MediaType>,
    ) -> Result<OutboundMessage, ConversionError> {
        let value = value
            .downcast_ref::<T>()
            .ok_or_else(|| ConversionError::new("JSON converter given a value of another type"))?;
        let body = serde_json::to_vec(value)
            .map_err(|e| ConversionError::with_source("JSON serialization failed", e))?;
        Ok(OutboundMessage {
            content_type: Some(MediaType::application_json()),
            body: Bytes::from(body),
        })
    }
}
