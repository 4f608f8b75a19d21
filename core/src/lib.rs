//! Request dispatcher core for the measurements form.
//!
//! # Overview
//! Reads method, endpoint and body from a `FormState`, rejects incomplete
//! input, sends one request through a host-supplied `Transport`, and writes a
//! single human-readable `DisplayMessage` to an `OutputSink`.
//!
//! # Design
//! - `RequestDispatcher` is stateless apart from its transport and base URL.
//! - Validation and response handling are ordered rule tables
//!   (`VALIDATION_RULES`, `STATUS_RULES`), first match wins.
//! - The core performs no I/O itself; hosts provide the transport, the form
//!   and the sink.

pub mod dispatcher;
pub mod error;
pub mod form;
pub mod http;
pub mod render;
pub mod validate;

pub use dispatcher::RequestDispatcher;
pub use error::{DispatchError, TransportError, ValidationError, INVALID_ENDPOINT};
pub use form::{DisplayMessage, FormState, OutputSink, RequestInput};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use render::{render_response, STATUS_RULES};
pub use validate::{validate, VALIDATION_RULES};
