//! The typed REST client.
//!
//! [`RestClient`] orchestrates one exchange per call:
//!
//! 1. ask the [`RequestFactory`] for a request bound to `(address, method)`,
//! 2. negotiate the `Accept` header from the converter registry,
//! 3. execute the request,
//! 4. run the [`ResponseErrorHandler`] before touching the body,
//! 5. decode the body through the first converter that can read the
//!    response's `Content-Type` into the requested type,
//! 6. assemble a [`ResponseEntity`] and close the response.
//!
//! The response handle is closed on every path out of a call, success or
//! failure.
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── mod           - RestClient facade and builder
//! └── error_handler - response error classification strategy
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use typed_rest::RestClient;
//!
//! # async fn run() -> typed_rest::Result<()> {
//! let client = RestClient::new();
//! let entity = client.get_for_entity::<String>("https://example.com").await?;
//! println!("{}: {:?}", entity.status(), entity.body());
//!
//! client.delete("https://example.com/old").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom wiring
//!
//! Transport, converters, and error policy are all injected at construction
//! and immutable afterwards:
//!
//! ```
//! use typed_rest::client::DefaultErrorHandler;
//! use typed_rest::converter::TextConverter;
//! use typed_rest::transport::{ReqwestRequestFactory, TransportConfig};
//! use typed_rest::RestClient;
//! use std::time::Duration;
//!
//! let client = RestClient::builder()
//!     .request_factory(ReqwestRequestFactory::with_config(TransportConfig {
//!         request_timeout: Duration::from_secs(5),
//!         ..TransportConfig::default()
//!     }))
//!     .converter(TextConverter::new())
//!     .error_handler(DefaultErrorHandler)
//!     .build();
//! # let _ = client;
//! ```

mod error_handler;

pub use error_handler::{DefaultErrorHandler, ResponseErrorHandler};

use std::any::{Any, TypeId};

use http::{header, HeaderMap, HeaderValue, Method};
use url::Url;

use crate::converter::{ConverterRegistry, InboundMessage, MessageConverter, OutboundMessage};
use crate::entity::ResponseEntity;
use crate::error::{ConversionError, RestError, Result};
use crate::media::{format_accept, MediaType};
use crate::transport::{ClientRequest, ClientResponse, ReqwestRequestFactory, RequestFactory};

/// Content-negotiating HTTP client over a pluggable transport.
///
/// Cheap to share behind an `Arc`; every operation owns its request and
/// response handles exclusively, so concurrent calls never interfere.
pub struct RestClient {
    request_factory: Box<dyn RequestFactory>,
    converters: ConverterRegistry,
    error_handler: Box<dyn ResponseErrorHandler>,
}

impl RestClient {
    /// Client with the default reqwest transport, default converters, and
    /// the default 4xx/5xx error policy.
    pub fn new() -> Self {
        RestClient::builder().build()
    }

    /// Start building a client with custom collaborators.
    pub fn builder() -> RestClientBuilder {
        RestClientBuilder::default()
    }

    /// Execute a GET and decode the response into an entity of `T`.
    ///
    /// The `Accept` header is the registry's acceptable media types for `T`
    /// and is omitted when that list is empty. An empty response body yields
    /// an entity whose body is `None`.
    pub async fn get_for_entity<T>(&self, url: &str) -> Result<ResponseEntity<T>>
    where
        T: Any + Send,
    {
        let request = self.prepare_read_request::<T>(url, Method::GET)?;
        self.execute_for_entity::<T>(request).await
    }

    /// Execute a GET and return just the decoded body.
    pub async fn get_for_object<T>(&self, url: &str) -> Result<Option<T>>
    where
        T: Any + Send,
    {
        Ok(self.get_for_entity::<T>(url).await?.into_body())
    }

    /// Execute a POST with an encoded body and decode the response into an
    /// entity of `T`.
    ///
    /// The writer converter is located before any request is created; if
    /// none matches, [`RestError::NoConverterForWrite`] is returned and the
    /// network is never touched. `content_type` constrains the writer
    /// choice; `None` lets the first capable converter pick its default.
    pub async fn post_for_entity<B, T>(
        &self,
        url: &str,
        body: &B,
        content_type: Option<&MediaType>,
    ) -> Result<ResponseEntity<T>>
    where
        B: Any + Sync,
        T: Any + Send,
    {
        let payload = self.encode_body(body, content_type)?;
        let mut request = self.prepare_read_request::<T>(url, Method::POST)?;
        apply_payload(request.as_mut(), payload)?;
        self.execute_for_entity::<T>(request).await
    }

    /// Execute a PUT with an encoded body, discarding any response body.
    pub async fn put<B>(&self, url: &str, body: &B, content_type: Option<&MediaType>) -> Result<()>
    where
        B: Any + Sync,
    {
        let payload = self.encode_body(body, content_type)?;
        let mut request = self.create_request(url, Method::PUT)?;
        apply_payload(request.as_mut(), payload)?;
        self.execute_for_status(request).await
    }

    /// Execute a DELETE. No Accept negotiation, no body read.
    pub async fn delete(&self, url: &str) -> Result<()> {
        let request = self.create_request(url, Method::DELETE)?;
        self.execute_for_status(request).await
    }

    /// Execute a HEAD and return the response headers.
    pub async fn head_for_headers(&self, url: &str) -> Result<HeaderMap> {
        let request = self.create_request(url, Method::HEAD)?;
        let response = request.execute().await?;
        let result = self
            .check_for_error(response.as_ref())
            .map(|()| response.headers().clone());
        response.close();
        result
    }

    fn create_request(&self, url: &str, method: Method) -> Result<Box<dyn ClientRequest>> {
        let url = Url::parse(url)?;
        tracing::debug!(%url, %method, "dispatching request");
        self.request_factory.create_request(url, method)
    }

    /// Create a request and negotiate its `Accept` header for `T`.
    fn prepare_read_request<T: Any>(
        &self,
        url: &str,
        method: Method,
    ) -> Result<Box<dyn ClientRequest>> {
        let mut request = self.create_request(url, method)?;
        let acceptable = self.converters.acceptable_media_types(TypeId::of::<T>());
        if !acceptable.is_empty() {
            let value = HeaderValue::from_str(&format_accept(&acceptable))
                .map_err(|e| ConversionError::with_source("invalid Accept header value", e))?;
            request.headers_mut().insert(header::ACCEPT, value);
        }
        Ok(request)
    }

    async fn execute_for_entity<T>(
        &self,
        request: Box<dyn ClientRequest>,
    ) -> Result<ResponseEntity<T>>
    where
        T: Any + Send,
    {
        let mut response = request.execute().await?;
        let result = self.extract_entity::<T>(response.as_mut()).await;
        response.close();
        result
    }

    async fn execute_for_status(&self, request: Box<dyn ClientRequest>) -> Result<()> {
        let response = request.execute().await?;
        let result = self.check_for_error(response.as_ref());
        response.close();
        result
    }

    /// Everything after the exchange: error check, reader lookup, decode,
    /// entity assembly. Runs against a borrowed response so the caller can
    /// close it whatever happens here.
    async fn extract_entity<T>(
        &self,
        response: &mut (dyn ClientResponse + '_),
    ) -> Result<ResponseEntity<T>>
    where
        T: Any + Send,
    {
        self.check_for_error(response)?;

        let status = response.status();
        let headers = response.headers().clone();
        let content_type = parse_content_type(&headers)?;
        let body = response.body().await?;
        if body.is_empty() {
            return Ok(ResponseEntity::new(None, headers, status));
        }

        let target = TypeId::of::<T>();
        let converter = self
            .converters
            .find_reader(target, content_type.as_ref())
            .ok_or_else(|| {
                tracing::warn!(?content_type, "no converter for response content type");
                RestError::UnsupportedMediaType {
                    content_type: raw_content_type(&headers),
                }
            })?;

        let message = InboundMessage {
            content_type: content_type.as_ref(),
            headers: &headers,
            body: &body,
        };
        let value = converter.read(target, message)?;
        let value = value
            .downcast::<T>()
            .map_err(|_| ConversionError::new("converter produced a value of an unexpected type"))?;
        Ok(ResponseEntity::new(Some(*value), headers, status))
    }

    fn encode_body<B: Any>(
        &self,
        body: &B,
        content_type: Option<&MediaType>,
    ) -> Result<OutboundMessage> {
        let converter = self
            .converters
            .find_writer(TypeId::of::<B>(), content_type)
            .ok_or_else(|| RestError::NoConverterForWrite {
                media_type: content_type.cloned(),
            })?;
        Ok(converter.write(body, content_type)?)
    }

    fn check_for_error(&self, response: &dyn ClientResponse) -> Result<()> {
        if self.error_handler.has_error(response) {
            let status = response.status();
            tracing::warn!(%status, "response classified as error");
            return Err(RestError::Status {
                status,
                status_text: response.status_text(),
                headers: response.headers().clone(),
            });
        }
        Ok(())
    }
}

impl Default for RestClient {
    fn default() -> Self {
        RestClient::new()
    }
}

/// Stamp the encoded payload onto an unsent request.
fn apply_payload(request: &mut dyn ClientRequest, payload: OutboundMessage) -> Result<()> {
    if let Some(content_type) = &payload.content_type {
        let value = HeaderValue::from_str(&content_type.to_string())
            .map_err(|e| ConversionError::with_source("invalid Content-Type header value", e))?;
        request.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    request.headers_mut().insert(
        header::CONTENT_LENGTH,
        HeaderValue::from(payload.body.len() as u64),
    );
    request.set_body(payload.body);
    Ok(())
}

/// Parse the response `Content-Type`, if any.
///
/// A present but unparseable value is an `UnsupportedMediaType`: nothing can
/// be negotiated against it.
fn parse_content_type(headers: &HeaderMap) -> Result<Option<MediaType>> {
    let Some(value) = headers.get(header::CONTENT_TYPE) else {
        return Ok(None);
    };
    let raw = value
        .to_str()
        .map_err(|_| RestError::UnsupportedMediaType { content_type: None })?;
    match MediaType::parse(raw) {
        Ok(media_type) => Ok(Some(media_type)),
        Err(_) => Err(RestError::UnsupportedMediaType {
            content_type: Some(raw.to_string()),
        }),
    }
}

fn raw_content_type(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Builds a [`RestClient`] from injected collaborators.
///
/// Unset parts fall back to defaults at [`build`](RestClientBuilder::build):
/// the reqwest transport, the default converter lineup
/// ([`ConverterRegistry::with_defaults`]), and [`DefaultErrorHandler`].
#[derive(Default)]
pub struct RestClientBuilder {
    request_factory: Option<Box<dyn RequestFactory>>,
    converters: Vec<Box<dyn MessageConverter>>,
    error_handler: Option<Box<dyn ResponseErrorHandler>>,
}

impl RestClientBuilder {
    /// Use a custom transport.
    pub fn request_factory<F>(mut self, factory: F) -> Self
    where
        F: RequestFactory + 'static,
    {
        self.request_factory = Some(Box::new(factory));
        self
    }

    /// Append a converter. Order of calls is registration order, and
    /// registration order is the lookup tie-break.
    pub fn converter<C>(mut self, converter: C) -> Self
    where
        C: MessageConverter + 'static,
    {
        self.converters.push(Box::new(converter));
        self
    }

    /// Replace the converter list wholesale.
    pub fn converters(mut self, converters: Vec<Box<dyn MessageConverter>>) -> Self {
        self.converters = converters;
        self
    }

    /// Use a custom error classification strategy.
    pub fn error_handler<H>(mut self, handler: H) -> Self
    where
        H: ResponseErrorHandler + 'static,
    {
        self.error_handler = Some(Box::new(handler));
        self
    }

    /// Finish, filling in defaults for anything not provided.
    pub fn build(self) -> RestClient {
        let converters = if self.converters.is_empty() {
            ConverterRegistry::with_defaults()
        } else {
            ConverterRegistry::new(self.converters)
        };
        RestClient {
            request_factory: self
                .request_factory
                .unwrap_or_else(|| Box::new(ReqwestRequestFactory::new())),
            converters,
            error_handler: self
                .error_handler
                .unwrap_or_else(|| Box::new(DefaultErrorHandler)),
        }
    }
}
