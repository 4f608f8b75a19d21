//! Validates form input, sends one request and renders the outcome.
//!
//! # Design
//! `RequestDispatcher` holds a `Transport` and an optional base URL and carries
//! no mutable state between calls, so overlapping invocations are independent.
//! The work is split the same way as the transport types: `build_request`
//! produces an `HttpRequest`, the transport executes it, and
//! `render::render_response` interprets the `HttpResponse`. `dispatch` folds
//! every failure into the message the user sees.

use tracing::{debug, warn};

use crate::error::{DispatchError, ValidationError};
use crate::form::{DisplayMessage, FormState, OutputSink, RequestInput};
use crate::http::{HttpRequest, Transport};
use crate::render::render_response;
use crate::validate::validate;

pub const CONTENT_TYPE_JSON: (&str, &str) = ("Content-Type", "application/json");

#[derive(Debug, Clone)]
pub struct RequestDispatcher<T> {
    transport: T,
    base_url: Option<String>,
}

impl<T: Transport> RequestDispatcher<T> {
    /// Dispatcher that passes endpoints to the transport verbatim.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            base_url: None,
        }
    }

    /// Resolve relative endpoints such as `/measurements/1` against `base_url`.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.trim_end_matches('/').to_string());
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Full URL the transport is asked to fetch for `endpoint`.
    pub fn resolve(&self, endpoint: &str) -> String {
        let absolute = endpoint.starts_with("http://") || endpoint.starts_with("https://");
        match &self.base_url {
            Some(base) if !absolute => {
                if endpoint.starts_with('/') {
                    format!("{base}{endpoint}")
                } else {
                    format!("{base}/{endpoint}")
                }
            }
            _ => endpoint.to_string(),
        }
    }

    pub fn build_request(&self, input: &RequestInput) -> Result<HttpRequest, ValidationError> {
        validate(input)?;
        let (name, value) = CONTENT_TYPE_JSON;
        Ok(HttpRequest {
            method: input.method,
            path: self.resolve(&input.endpoint),
            headers: vec![(name.to_string(), value.to_string())],
            body: input.method.carries_body().then(|| input.body.clone()),
        })
    }

    /// Like `dispatch`, but hands back the classified failure.
    pub fn try_dispatch(&self, input: &RequestInput) -> Result<DisplayMessage, DispatchError> {
        let request = self.build_request(input)?;
        debug!(method = %request.method, path = %request.path, "sending request");
        let response = self.transport.send(&request)?;
        render_response(input.method, &response)
    }

    pub fn dispatch(&self, input: &RequestInput) -> DisplayMessage {
        self.try_dispatch(input).unwrap_or_else(|err| {
            match &err {
                DispatchError::Validation(_) => {}
                DispatchError::Transport(cause) => {
                    warn!(%cause, endpoint = %input.endpoint, "request failed")
                }
                DispatchError::Parse(cause) => {
                    warn!(%cause, endpoint = %input.endpoint, "unreadable response")
                }
            }
            DisplayMessage::new(err.display_message())
        })
    }

    /// Read the form, dispatch it, and write exactly one message to `sink`.
    pub fn send_request<F, S>(&self, form: &F, sink: &mut S)
    where
        F: FormState + ?Sized,
        S: OutputSink + ?Sized,
    {
        let input = form.read();
        sink.write(&self.dispatch(&input));
    }
}
