//! Error taxonomy for the HTTP surface.
//!
//! Validation failures carry every failing field back to the client;
//! anything else is logged where it happens and surfaced as an opaque 500.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

/// Per-field validation messages, keyed by the full field path
/// (e.g. `date`, `insumos.0.hour`).
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }
}

#[derive(Debug)]
pub enum ApiError {
    /// Malformed or out-of-range input; 400 naming every failing field.
    Validation(FieldErrors),
    /// Storage failure or any other unexpected error; opaque 500.
    Internal,
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": errors }))).into_response()
            }
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Something went wrong, man" })),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_accumulate_per_field() {
        let mut errors = FieldErrors::new();
        errors.push("date", "Required");
        errors.push("hour", "Expected an integer between 1 and 25");
        errors.push("hour", "Required");

        assert!(!errors.is_empty());
        assert!(errors.contains("date"));
        assert!(errors.contains("hour"));

        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(value["hour"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_validation_error_serializes_field_map() {
        let mut errors = FieldErrors::new();
        errors.push("unit_id", "Invalid uuid");
        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(value["unit_id"][0], "Invalid uuid");
    }
}
