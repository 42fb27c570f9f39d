//! Request validation.
//!
//! Rules run against the raw JSON payload before any persistence or audit
//! side effect. A field with no `Required` rule is optional: absence is not
//! a failure, but a present value still has to satisfy the bounds.

use serde_json::Value;
use std::collections::HashMap;

use crate::error::ApiError;

/// Validation failures, per field, in rule order
pub type FieldErrors = HashMap<String, Vec<String>>;

pub const FAILED_MESSAGE: &str = "The given data was invalid.";

#[derive(Debug, Clone, Copy)]
pub enum Rule {
    Required,
    MinLen(usize),
    MaxLen(usize),
    OneOf(&'static [&'static str]),
    /// Field must equal its `{field}_confirmation` twin
    Confirmed,
    Email,
}

/// Check a payload against a rule set, collecting every failed rule per field
pub fn validate(payload: &Value, rules: &[(&str, &[Rule])]) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    for (field, field_rules) in rules.iter().copied() {
        let value = field_string(payload, field);
        let label = field.replace('_', " ");

        for rule in field_rules.iter() {
            let failure = match rule {
                Rule::Required => {
                    if value.is_none() {
                        Some(format!("The {label} field is required."))
                    } else {
                        None
                    }
                }
                Rule::MinLen(min) => value.as_ref().and_then(|v| {
                    if v.chars().count() < *min {
                        Some(format!("The {label} field must be at least {min} characters."))
                    } else {
                        None
                    }
                }),
                Rule::MaxLen(max) => value.as_ref().and_then(|v| {
                    if v.chars().count() > *max {
                        Some(format!(
                            "The {label} field must not be greater than {max} characters."
                        ))
                    } else {
                        None
                    }
                }),
                Rule::OneOf(allowed) => value.as_ref().and_then(|v| {
                    if !allowed.contains(&v.as_str()) {
                        Some(format!("The selected {label} is invalid."))
                    } else {
                        None
                    }
                }),
                Rule::Confirmed => value.as_ref().and_then(|v| {
                    let confirmation = field_string(payload, &format!("{field}_confirmation"));
                    if confirmation.as_deref() != Some(v.as_str()) {
                        Some(format!("The {label} field confirmation does not match."))
                    } else {
                        None
                    }
                }),
                Rule::Email => value.as_ref().and_then(|v| {
                    if !is_email(v) {
                        Some(format!("The {label} field must be a valid email address."))
                    } else {
                        None
                    }
                }),
            };

            if let Some(message) = failure {
                errors.entry(field.to_string()).or_default().push(message);
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Field value as the string form the rules evaluate. Numbers and booleans
/// are coerced so `completed: 1` and `completed: "1"` validate alike.
pub fn field_string(payload: &Value, field: &str) -> Option<String> {
    match payload.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        _ => None,
    }
}

pub fn into_api_error(errors: FieldErrors) -> ApiError {
    ApiError::unprocessable_entity(FAILED_MESSAGE, errors)
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(char::is_whitespace)
}
