//! Error types for the request dispatcher.
//!
//! # Design
//! Every failure ends up as a message on the output sink, so these types
//! exist to classify, not to propagate. `ValidationError` renders as the exact
//! text shown to the user. Transport and parse failures keep their cause for
//! logging but all render as the generic `INVALID_ENDPOINT` text.

use thiserror::Error;

/// Message shown for any failure that is not a validation error.
pub const INVALID_ENDPOINT: &str = "Invalid endpoint";

/// Form input rejected before any request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Endpoint is required.")]
    EndpointRequired,

    #[error("Body is required for POST method.")]
    BodyRequired,

    #[error("DELETE requests require a measurement ID (e.g., /measurements/1)")]
    MeasurementIdRequired,
}

/// The request never produced a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The resolved endpoint is not a usable URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Connecting, sending, or receiving the status line failed.
    #[error("connection failed: {0}")]
    Connection(String),
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body on a branch that reads it was unreadable or not a
    /// usable JSON value.
    #[error("response body is not usable JSON: {0}")]
    Parse(String),
}

impl DispatchError {
    /// Text written to the output sink for this failure.
    pub fn display_message(&self) -> String {
        match self {
            DispatchError::Validation(e) => e.to_string(),
            DispatchError::Transport(_) | DispatchError::Parse(_) => INVALID_ENDPOINT.to_string(),
        }
    }
}
