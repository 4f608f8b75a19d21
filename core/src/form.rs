//! Form input and output ports.
//!
//! # Design
//! The dispatcher never reaches for ambient UI state. Hosts hand it a
//! `FormState` to read the three fields from and an `OutputSink` to write the
//! result into, which lets tests substitute plain values for both.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::http::HttpMethod;

/// Values entered on the form for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestInput {
    pub method: HttpMethod,
    pub endpoint: String,
    #[serde(default)]
    pub body: String,
}

impl RequestInput {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: body.into(),
        }
    }
}

/// Read port for the method, endpoint and body fields.
pub trait FormState {
    fn read(&self) -> RequestInput;
}

impl FormState for RequestInput {
    fn read(&self) -> RequestInput {
        self.clone()
    }
}

/// Final text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayMessage(String);

impl DisplayMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DisplayMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Write port for the output element. Each write replaces what was shown.
pub trait OutputSink {
    fn write(&mut self, message: &DisplayMessage);
}

impl OutputSink for String {
    fn write(&mut self, message: &DisplayMessage) {
        self.clear();
        self.push_str(message.as_str());
    }
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn write(&mut self, message: &DisplayMessage) {
        (**self).write(message)
    }
}
