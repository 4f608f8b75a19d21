//! Blocking HTTP transport backed by ureq.
//!
//! # Design
//! ureq's status-code-as-error behaviour is switched off so 4xx/5xx answers
//! come back as `HttpResponse` data and the dispatcher decides what they mean.
//! Only failing to reach the server is an error. A body that cannot be read
//! is handed over as `HttpResponse::unreadable` so status-only rules still
//! apply.

use measure_core::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
use ureq::{Agent, RequestBuilder};

#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn with_headers<B>(
    mut builder: RequestBuilder<B>,
    headers: &[(String, String)],
) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn classify(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::BadUri(uri) => TransportError::InvalidUrl(uri),
        other => TransportError::Connection(other.to_string()),
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let path = request.path.as_str();
        let headers = request.headers.as_slice();
        let body = request.body.as_deref();

        let result = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(path), headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(path), headers).call(),
            HttpMethod::Post => {
                let builder = with_headers(self.agent.post(path), headers);
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
            HttpMethod::Put => {
                let builder = with_headers(self.agent.put(path), headers);
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(classify)?;

        let status = response.status().as_u16();
        let response = match response.body_mut().read_to_string() {
            Ok(body) => HttpResponse::new(status, body),
            Err(e) => {
                tracing::debug!(status, path, error = %e, "response body unreadable");
                HttpResponse::unreadable(status, e.to_string())
            }
        };
        tracing::debug!(status, path, "response received");
        Ok(response)
    }
}
