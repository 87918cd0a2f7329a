//! Message converters and the converter registry.
//!
//! A converter encodes and decodes one combination of Rust type and media
//! type. The registry holds an ordered list of converters and answers three
//! questions for the client facade:
//!
//! - which converter can decode the response's content type into the
//!   requested result type ([`ConverterRegistry::find_reader`]),
//! - which converter can encode an outgoing value
//!   ([`ConverterRegistry::find_writer`]),
//! - which media types should be advertised in the `Accept` header for a
//!   result type ([`ConverterRegistry::acceptable_media_types`]).
//!
//! Registration order is the tie-break: the first converter that claims a
//! capability wins.
//!
//! # Module Organization
//!
//! ```text
//! converter/
//! ├── text    - String <-> text/plain
//! ├── json    - serde types <-> application/json
//! ├── binary  - Bytes / Vec<u8> <-> application/octet-stream
//! └── form    - key/value pairs <-> application/x-www-form-urlencoded
//! ```
//!
//! # Type matching
//!
//! The "which Rust type" axis of a capability check is an explicit
//! [`TypeId`] comparison. A converter states up front which concrete types
//! it handles; values cross the registry boundary as `Box<dyn Any>` and are
//! downcast exactly once, by the facade.

mod binary;
mod form;
mod json;
mod text;

pub use binary::BinaryConverter;
pub use form::FormConverter;
pub use json::JsonConverter;
pub use text::TextConverter;

use std::any::{Any, TypeId};

use bytes::Bytes;
use http::HeaderMap;

use crate::error::ConversionError;
use crate::media::MediaType;

/// An inbound payload handed to a converter's `read`.
///
/// Borrowed view over the already-received response: the parsed content
/// type, the full response headers, and the body bytes.
pub struct InboundMessage<'a> {
    /// Parsed `Content-Type` of the response, if present and well-formed.
    pub content_type: Option<&'a MediaType>,
    /// All response headers.
    pub headers: &'a HeaderMap,
    /// The complete body.
    pub body: &'a [u8],
}

/// An outbound payload produced by a converter's `write`.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    /// Content type the converter chose for the encoded body.
    pub content_type: Option<MediaType>,
    /// The encoded body.
    pub body: Bytes,
}

/// Encodes and decodes values for one set of (type, media type) pairs.
///
/// Implementations must answer `can_read`/`can_write` consistently with what
/// `read`/`write` actually accept: the registry only dispatches to a
/// converter whose predicate returned true.
pub trait MessageConverter: Send + Sync {
    /// Whether this converter can decode `media_type` into `target`.
    ///
    /// `None` means "unconstrained": can this converter produce `target`
    /// from any of its supported media types at all. Both forms are used —
    /// the unconstrained check when computing the `Accept` header, the
    /// constrained check when matching the response's `Content-Type`.
    fn can_read(&self, target: TypeId, media_type: Option<&MediaType>) -> bool;

    /// Whether this converter can encode a value of `source` as `media_type`
    /// (or as its default media type when `None`).
    fn can_write(&self, source: TypeId, media_type: Option<&MediaType>) -> bool;

    /// The media types this converter supports, most preferred first.
    fn supported_media_types(&self) -> Vec<MediaType>;

    /// Decode the message body into a value of type `target`.
    fn read(
        &self,
        target: TypeId,
        message: InboundMessage<'_>,
    ) -> Result<Box<dyn Any + Send>, ConversionError>;

    /// Encode `value` into a wire payload, labelling it with a content type.
    fn write(
        &self,
        value: &dyn Any,
        media_type: Option<&MediaType>,
    ) -> Result<OutboundMessage, ConversionError>;
}

/// Shared media-type capability check used by the shipped converters:
/// unconstrained always passes, otherwise the requested media type must be
/// compatible with at least one supported type.
pub(crate) fn supports_media(supported: &[MediaType], media_type: Option<&MediaType>) -> bool {
    match media_type {
        None => true,
        Some(mt) => supported.iter().any(|s| s.is_compatible_with(mt)),
    }
}

/// Ordered, immutable collection of converters.
///
/// Populated once at construction; lookups are read-only and safe to run
/// concurrently.
pub struct ConverterRegistry {
    converters: Vec<Box<dyn MessageConverter>>,
}

impl ConverterRegistry {
    /// Build a registry from an explicit, ordered converter list.
    pub fn new(converters: Vec<Box<dyn MessageConverter>>) -> Self {
        ConverterRegistry { converters }
    }

    /// The default lineup: text, binary, and form converters, in that order.
    ///
    /// JSON converters are type-specific ([`JsonConverter`]) and registered
    /// by the caller for each payload type.
    pub fn with_defaults() -> Self {
        ConverterRegistry::new(vec![
            Box::new(TextConverter::new()),
            Box::new(BinaryConverter::new()),
            Box::new(FormConverter::new()),
        ])
    }

    /// Number of registered converters.
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Whether no converters are registered.
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// First converter able to decode `media_type` into `target`.
    pub fn find_reader(
        &self,
        target: TypeId,
        media_type: Option<&MediaType>,
    ) -> Option<&dyn MessageConverter> {
        self.converters
            .iter()
            .map(|c| c.as_ref())
            .find(|c| c.can_read(target, media_type))
    }

    /// First converter able to encode `source` as `media_type`.
    pub fn find_writer(
        &self,
        source: TypeId,
        media_type: Option<&MediaType>,
    ) -> Option<&dyn MessageConverter> {
        self.converters
            .iter()
            .map(|c| c.as_ref())
            .find(|c| c.can_write(source, media_type))
    }

    /// Media types to advertise in `Accept` when requesting `target`.
    ///
    /// Collected from every converter that can read `target`, in
    /// registration order, deduplicated. Wildcard ranges are dropped when at
    /// least one concrete type is available; a wildcard-only result is kept
    /// as-is so the header still says something useful.
    pub fn acceptable_media_types(&self, target: TypeId) -> Vec<MediaType> {
        let mut collected: Vec<MediaType> = Vec::new();
        for converter in &self.converters {
            if !converter.can_read(target, None) {
                continue;
            }
            for media_type in converter.supported_media_types() {
                if !collected.contains(&media_type) {
                    collected.push(media_type);
                }
            }
        }
        let has_concrete = collected.iter().any(MediaType::is_concrete);
        if has_concrete {
            collected.retain(MediaType::is_concrete);
        }
        collected
    }
}
