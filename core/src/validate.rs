//! Pre-flight checks on the form input.
//!
//! Rules are evaluated in table order and the first one that rejects the
//! input wins. An input that passes every rule may be sent.

use tracing::debug;

use crate::error::ValidationError;
use crate::form::RequestInput;
use crate::http::HttpMethod;

/// Endpoint fragment a DELETE target must contain.
pub const MEASUREMENT_ID_PATH: &str = "/measurements/";

pub struct ValidationRule {
    pub name: &'static str,
    pub rejects: fn(&RequestInput) -> bool,
    pub error: ValidationError,
}

pub const VALIDATION_RULES: &[ValidationRule] = &[
    ValidationRule {
        name: "endpoint-required",
        rejects: endpoint_missing,
        error: ValidationError::EndpointRequired,
    },
    ValidationRule {
        name: "post-body-required",
        rejects: post_without_body,
        error: ValidationError::BodyRequired,
    },
    ValidationRule {
        name: "delete-needs-id",
        rejects: delete_without_id,
        error: ValidationError::MeasurementIdRequired,
    },
];

fn endpoint_missing(input: &RequestInput) -> bool {
    input.endpoint.is_empty() || input.endpoint == "/"
}

fn post_without_body(input: &RequestInput) -> bool {
    input.method == HttpMethod::Post && input.body.is_empty()
}

fn delete_without_id(input: &RequestInput) -> bool {
    input.method == HttpMethod::Delete && !input.endpoint.contains(MEASUREMENT_ID_PATH)
}

pub fn validate(input: &RequestInput) -> Result<(), ValidationError> {
    match VALIDATION_RULES.iter().find(|rule| (rule.rejects)(input)) {
        Some(rule) => {
            debug!(rule = rule.name, "form input rejected");
            Err(rule.error)
        }
        None => Ok(()),
    }
}
