//! Transport abstraction: request factories, live requests, responses.
//!
//! The client facade never talks to the network itself. It asks a
//! [`RequestFactory`] for a [`ClientRequest`] bound to one `(address,
//! method)` pair, fills in headers and an optional body, and calls
//! [`ClientRequest::execute`], which consumes the request and yields a
//! [`ClientResponse`]. Swapping the factory swaps the whole transport,
//! which is also how the pipeline is tested without sockets.
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`RequestFactory`] | Produces a request handle per (address, method) |
//! | [`ClientRequest`] | Mutable until executed; consumed by `execute` |
//! | [`ClientResponse`] | Status, headers, single-consumption body, `close` |
//! | [`ReqwestRequestFactory`] | Production factory over `reqwest` |
//! | [`TransportConfig`] | Timeouts and connection-pool settings |
//!
//! # Ownership
//!
//! A request/response pair belongs to exactly one call. `execute` takes the
//! request by value and `close` takes the response by value, so neither can
//! be reused or shared, and a response cannot be closed twice.

mod reqwest;

pub use self::reqwest::{ReqwestRequestFactory, TransportConfig};

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use url::Url;

use crate::error::Result;

/// Produces request handles bound to a destination.
///
/// Implementations must be deterministic for a given configuration: the same
/// `(url, method)` pair always yields an equivalent request handle.
pub trait RequestFactory: Send + Sync {
    /// Create a new, unsent request for `method` against `url`.
    ///
    /// # Errors
    ///
    /// Fails with [`RestError::Transport`](crate::RestError::Transport) when
    /// the transport cannot even construct a request for this destination.
    fn create_request(&self, url: Url, method: Method) -> Result<Box<dyn ClientRequest>>;
}

/// A request that has been created but not yet sent.
///
/// Headers and body are mutable until [`execute`](ClientRequest::execute)
/// consumes the handle.
#[async_trait]
pub trait ClientRequest: Send {
    /// The headers that will be sent.
    fn headers(&self) -> &HeaderMap;

    /// Mutable access to the headers; only meaningful before `execute`.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Attach a body to the request.
    fn set_body(&mut self, body: Bytes);

    /// Perform the exchange.
    ///
    /// # Errors
    ///
    /// Any connection, DNS, timeout, or stream failure surfaces as
    /// [`RestError::Transport`](crate::RestError::Transport); no partially
    /// populated response is ever returned.
    async fn execute(self: Box<Self>) -> Result<Box<dyn ClientResponse>>;
}

/// A received response: status and headers are available immediately, the
/// body can be read once, and the handle must be closed exactly once.
#[async_trait]
pub trait ClientResponse: Send {
    /// The response status code.
    fn status(&self) -> StatusCode;

    /// The status text accompanying the code.
    fn status_text(&self) -> String {
        self.status()
            .canonical_reason()
            .unwrap_or_default()
            .to_string()
    }

    /// The response headers.
    fn headers(&self) -> &HeaderMap;

    /// Read the complete body. May be called at most once; a second call is
    /// a transport error.
    async fn body(&mut self) -> Result<Bytes>;

    /// Release the response and its connection. Consumes the handle, so a
    /// double close cannot be expressed. Closing without reading the body is
    /// allowed.
    fn close(self: Box<Self>) {}
}
