//! The network seam: a `Transport` turns an `HttpRequest` into an
//! `HttpResponse`.
//!
//! Transports return non-2xx statuses as ordinary responses; only failures
//! to complete the round-trip (DNS, connect, timeout, body read) are errors.
//! A body that is not UTF-8 is still a response: invalid sequences become
//! U+FFFD and the classifier rejects it as invalid JSON.

use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::http::{Headers, HttpMethod, HttpRequest, HttpResponse};

/// Failure to complete an HTTP round-trip.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Sends a request and returns status, headers and body.
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

/// Blocking transport backed by a `ureq` agent.
///
/// The agent is configured so 4xx/5xx responses come back as data, letting
/// the response classifier interpret them.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &Headers) -> ureq::RequestBuilder<B> {
    for (name, value) in headers.iter() {
        builder = builder.header(name, value);
    }
    builder
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url();
        debug!(method = request.method.as_str(), url = %url, "ureq round-trip");

        let result = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(&url), &request.headers).call(),
            HttpMethod::Post => {
                let builder = with_headers(self.agent.post(&url), &request.headers);
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response =
            result.map_err(|e| TransportError::with_source(format!("{} {url} failed: {e}", request.method.as_str()), e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string())))
            .collect::<Headers>();
        let bytes = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| TransportError::with_source(format!("reading body from {url} failed: {e}"), e))?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        Ok(HttpResponse {
            status,
            url,
            headers,
            body,
        })
    }
}
