// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::database::manager::StoreError;
use crate::logging;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 422 Unprocessable Entity (well-formed JSON that failed validation)
    UnprocessableEntity {
        message: String,
        errors: HashMap<String, Vec<String>>,
    },

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Unauthorized(_) => 401,
            ApiError::NotFound(_) => 404,
            ApiError::UnprocessableEntity { .. } => 422,
            ApiError::InternalServerError(_) => 500,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::UnprocessableEntity { message, .. } => message,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    /// Convert to JSON response body
    ///
    /// Body shapes are part of the wire contract: validation failures carry a
    /// per-field `errors` map, everything else is `{"message": ...}`.
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::UnprocessableEntity { message, errors } => {
                json!({
                    "message": message,
                    "errors": errors,
                })
            }
            _ => json!({ "message": self.message() }),
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn unprocessable_entity(
        message: impl Into<String>,
        errors: HashMap<String, Vec<String>>,
    ) -> Self {
        ApiError::UnprocessableEntity { message: message.into(), errors }
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

// Convert store faults to ApiError. Internal detail goes to the log sinks
// only; the client always sees a generic message.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        logging::error("Failed : ", &err.to_string());
        ApiError::internal_server_error("Server Error")
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_body_carries_field_errors() {
        let mut errors = HashMap::new();
        errors.insert("title".to_string(), vec!["The title field is required.".to_string()]);
        let err = ApiError::unprocessable_entity("The given data was invalid.", errors);

        assert_eq!(err.status_code(), 422);
        let body = err.to_json();
        assert_eq!(body["message"], "The given data was invalid.");
        assert_eq!(body["errors"]["title"][0], "The title field is required.");
    }

    #[test]
    fn not_found_body_is_message_only() {
        let err = ApiError::not_found("Todo Not Found");
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_json(), json!({ "message": "Todo Not Found" }));
    }
}
