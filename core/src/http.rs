//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. The dispatcher builds an
//! `HttpRequest`, hands it to a `Transport` supplied by the host, and
//! interprets the returned `HttpResponse`. Any status code the server sends
//! back is a response; only failing to get one at all is a `TransportError`.
//! A body that could not be read is still a response: the status alone may
//! be enough to decide the message.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// HTTP method selected on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Methods whose requests carry the form body.
    pub fn carries_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Built by `RequestDispatcher::build_request`. `path` is the fully
/// resolved target the transport should hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// `body` is `Err` with the cause when the status line arrived but the body
/// could not be read as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Result<String, String>,
}

impl HttpResponse {
    /// Response with no headers, the shape most transports and tests need.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Ok(body.into()),
        }
    }

    pub fn unreadable(status: u16, cause: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Err(cause.into()),
        }
    }
}

/// Executes one HTTP round-trip on behalf of the dispatcher.
///
/// Implementations must return non-2xx statuses as `Ok` responses. `Err` is
/// reserved for failing to obtain a response at all.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}
