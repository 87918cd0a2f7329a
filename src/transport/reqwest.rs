//! Production transport backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use url::Url;

use crate::error::{RestError, Result};
use crate::transport::{ClientRequest, ClientResponse, RequestFactory};

/// Connection and timeout settings for [`ReqwestRequestFactory`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Time allowed for establishing a connection.
    pub connect_timeout: Duration,
    /// Total time allowed per request, from send to body completion.
    pub request_timeout: Duration,
    /// How long idle pooled connections are kept around.
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections kept per host.
    pub pool_max_idle_per_host: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 16,
        }
    }
}

/// [`RequestFactory`] that executes requests over a shared [`reqwest::Client`].
///
/// Cloning is cheap; clones share the underlying connection pool. Timeouts
/// expire as [`RestError::Transport`].
#[derive(Clone)]
pub struct ReqwestRequestFactory {
    client: reqwest::Client,
}

impl ReqwestRequestFactory {
    /// Factory with default configuration.
    pub fn new() -> Self {
        Self::with_config(TransportConfig::default())
    }

    /// Factory with custom timeouts and pool settings.
    pub fn with_config(config: TransportConfig) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build()
            .unwrap_or_default();
        ReqwestRequestFactory { client }
    }
}

impl Default for ReqwestRequestFactory {
    fn default() -> Self {
        ReqwestRequestFactory::new()
    }
}

impl RequestFactory for ReqwestRequestFactory {
    fn create_request(&self, url: Url, method: Method) -> Result<Box<dyn ClientRequest>> {
        Ok(Box::new(ReqwestClientRequest {
            client: self.client.clone(),
            url,
            method,
            headers: HeaderMap::new(),
            body: None,
        }))
    }
}

struct ReqwestClientRequest {
    client: reqwest::Client,
    url: Url,
    method: Method,
    headers: HeaderMap,
    body: Option<Bytes>,
}

#[async_trait]
impl ClientRequest for ReqwestClientRequest {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn set_body(&mut self, body: Bytes) {
        self.body = Some(body);
    }

    async fn execute(self: Box<Self>) -> Result<Box<dyn ClientResponse>> {
        let mut builder = self
            .client
            .request(self.method, self.url)
            .headers(self.headers);
        if let Some(body) = self.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(RestError::transport)?;

        let status = response.status();
        let headers = response.headers().clone();
        Ok(Box::new(ReqwestClientResponse {
            status,
            headers,
            inner: Some(response),
        }))
    }
}

struct ReqwestClientResponse {
    status: StatusCode,
    headers: HeaderMap,
    // Taken on the first body read; dropping it on close releases the
    // connection back to the pool.
    inner: Option<reqwest::Response>,
}

#[async_trait]
impl ClientResponse for ReqwestClientResponse {
    fn status(&self) -> StatusCode {
        self.status
    }

    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    async fn body(&mut self) -> Result<Bytes> {
        let response = self.inner.take().ok_or_else(|| {
            RestError::transport(std::io::Error::new(
                std::io::ErrorKind::Other,
                "response body already consumed",
            ))
        })?;
        response.bytes().await.map_err(RestError::transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_starts_with_empty_headers() {
        let factory = ReqwestRequestFactory::new();
        let request = factory
            .create_request(Url::parse("https://example.com/").unwrap(), Method::GET)
            .unwrap();
        assert!(request.headers().is_empty());
    }

    #[test]
    fn request_headers_are_mutable_until_sent() {
        let factory = ReqwestRequestFactory::with_config(TransportConfig::default());
        let mut request = factory
            .create_request(Url::parse("https://example.com/").unwrap(), Method::POST)
            .unwrap();
        request.headers_mut().insert(
            http::header::ACCEPT,
            http::HeaderValue::from_static("text/plain"),
        );
        assert_eq!(request.headers().len(), 1);
    }
}
