#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # typed-rest: a content-negotiating HTTP client pipeline
//!
//! This crate implements the client side of an HTTP exchange as a set of
//! small, independently replaceable parts: a request factory that binds a
//! request to a destination, message converters that encode and decode typed
//! payloads by media type, an error-classification strategy, and a facade
//! that wires them together per call.
//!
//! ## Overview
//!
//! One call flows through the pipeline as:
//!
//! ```text
//! RestClient
//!   └─> RequestFactory::create_request(url, method)
//!         └─> Accept header from ConverterRegistry::acceptable_media_types
//!               └─> ClientRequest::execute()
//!                     └─> ResponseErrorHandler::has_error (before any body read)
//!                           └─> converter.read(Content-Type, body)
//!                                 └─> ResponseEntity { body, headers, status }
//! ```
//!
//! The response handle is closed exactly once on every path out of a call,
//! including transport failures, error statuses, and decode failures.
//!
//! ## Key Features
//!
//! - **Typed results**: `get_for_entity::<T>` yields a
//!   [`ResponseEntity<T>`] carrying the decoded body, headers, and status
//! - **Content negotiation**: the `Accept` header is computed from the
//!   converters registered for the requested type, in registration order
//! - **Pluggable transport**: any [`transport::RequestFactory`] works; a
//!   `reqwest`-backed one ships by default and tests inject mocks
//! - **Pluggable error policy**: the 4xx/5xx boundary is a strategy object,
//!   not a fixed rule
//! - **Closed taxonomy of failures**: transport, status, unsupported media
//!   type, missing writer, conversion — nothing is swallowed
//!
//! ## Module Structure
//!
//! - **[client]** - `RestClient` facade, builder, error-handler strategy
//! - **[converter]** - message converters and the ordered registry
//! - **[transport]** - request factory / request / response abstractions and
//!   the reqwest implementation
//! - **[media]** - media type parsing, formatting, compatibility
//! - **[entity]** - the `ResponseEntity` result value
//! - **[error]** - error taxonomy and result alias

pub mod client;
pub mod converter;
pub mod entity;
pub mod error;
pub mod media;
pub mod transport;

pub use client::{DefaultErrorHandler, ResponseErrorHandler, RestClient, RestClientBuilder};
pub use converter::{ConverterRegistry, MessageConverter};
pub use entity::ResponseEntity;
pub use error::{ConversionError, RestError, Result};
pub use media::MediaType;
pub use transport::{ClientRequest, ClientResponse, RequestFactory};
