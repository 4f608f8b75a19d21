//! Turns a server response into the text shown to the user.
//!
//! # Design
//! `STATUS_RULES` is checked top to bottom and the first rule matching the
//! method and status decides the message, falling back to `OTHER_STATUS`.
//! Rules with a `Fixed` message are listed first and never look at the body,
//! so a 400 or 405 answer is reported even when its body is HTML or empty.
//! Every later rule needs the body as JSON; a body that could not be read or
//! does not parse is a `DispatchError::Parse`. Numbers are shown the way a
//! browser prints them, so a whole `14.0` reads as `14`.

use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::error::DispatchError;
use crate::form::DisplayMessage;
use crate::http::{HttpMethod, HttpResponse};

pub enum Render {
    /// Static text; the body is not read.
    Fixed(&'static str),
    /// A top-level field of the JSON body followed by `label` and the status.
    Field {
        key: &'static str,
        label: &'static str,
    },
    /// The whole JSON body, indented, followed by `label` and the status.
    Pretty { label: &'static str },
}

pub struct StatusRule {
    pub name: &'static str,
    pub matches: fn(HttpMethod, u16) -> bool,
    pub render: Render,
}

pub const STATUS_RULES: &[StatusRule] = &[
    StatusRule {
        name: "write-bad-request",
        matches: write_bad_request,
        render: Render::Fixed("Invalid JSON format in the body."),
    },
    StatusRule {
        name: "put-not-allowed",
        matches: put_not_allowed,
        render: Render::Fixed("Invalid endpoint for PUT method."),
    },
    StatusRule {
        name: "ok",
        matches: ok,
        render: Render::Field {
            key: "message",
            label: " Status: ",
        },
    },
    StatusRule {
        name: "not-found",
        matches: not_found,
        render: Render::Field {
            key: "error",
            label: " Error Code: ",
        },
    },
];

/// Applies when no entry of `STATUS_RULES` matches.
pub const OTHER_STATUS: StatusRule = StatusRule {
    name: "other",
    matches: any,
    render: Render::Pretty {
        label: " Status Code: ",
    },
};

fn write_bad_request(method: HttpMethod, status: u16) -> bool {
    method.carries_body() && status == 400
}

fn put_not_allowed(method: HttpMethod, status: u16) -> bool {
    method == HttpMethod::Put && status == 405
}

fn ok(_: HttpMethod, status: u16) -> bool {
    status == 200
}

fn not_found(_: HttpMethod, status: u16) -> bool {
    status == 404
}

fn any(_: HttpMethod, _: u16) -> bool {
    true
}

pub fn render_response(
    method: HttpMethod,
    response: &HttpResponse,
) -> Result<DisplayMessage, DispatchError> {
    let status = response.status;
    let rule = STATUS_RULES
        .iter()
        .find(|rule| (rule.matches)(method, status))
        .unwrap_or(&OTHER_STATUS);
    debug!(rule = rule.name, %method, status, "rendering response");

    let text = match &rule.render {
        Render::Fixed(text) => text.to_string(),
        Render::Field { key, label } => {
            let body = parse_body(response)?;
            if body.is_null() {
                return Err(DispatchError::Parse(format!("cannot read '{key}' of null")));
            }
            format!("{}{label}{status}", field_text(body.get(*key)))
        }
        Render::Pretty { label } => {
            let body = display_numbers(parse_body(response)?);
            let pretty = serde_json::to_string_pretty(&body)
                .map_err(|e| DispatchError::Parse(e.to_string()))?;
            format!("{pretty}{label}{status}")
        }
    };
    Ok(DisplayMessage::new(text))
}

fn parse_body(response: &HttpResponse) -> Result<Value, DispatchError> {
    let text = response.body.as_deref().map_err(|cause| DispatchError::Parse(cause.clone()))?;
    serde_json::from_str(text).map_err(|e| DispatchError::Parse(e.to_string()))
}

/// Largest integer a browser holds exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Whole floats within the safe range print without a fraction.
fn display_number(n: &Number) -> Number {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER => {
            Number::from(f as i64)
        }
        _ => n.clone(),
    }
}

fn display_numbers(value: Value) -> Value {
    match value {
        Value::Number(n) => Value::Number(display_number(&n)),
        Value::Array(items) => Value::Array(items.into_iter().map(display_numbers).collect()),
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k, display_numbers(v)))
                .collect::<Map<String, Value>>(),
        ),
        other => other,
    }
}

/// Text for a body field spliced into a message. A missing field (or a body
/// that is not an object) reads as `undefined`; a `null` body is rejected
/// before this point.
fn field_text(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(value) => value_text(value),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => display_number(n).to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => value_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}
