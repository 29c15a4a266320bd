//! Typed error handling for the livra middleware
//!
//! This module provides the error types that cross the crate boundary:
//!
//! - [`FieldError`]: a single schema violation, addressed by a dotted path
//! - [`ValidationRejection`]: the structured 400 response written when a
//!   request fails its declared schema
//! - [`LivraError`]: the top-level error type, mapping each category to an
//!   HTTP status code and a JSON response body
//!
//! Expected schema violations are fully described to the client. Unexpected
//! faults are logged server-side and answered with a generic body that never
//! exposes internal details.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use std::fmt;

/// Generic client-facing message for schema rejections
pub const VALIDATION_FAILED_MESSAGE: &str = "Les données fournies sont invalides";

/// Generic client-facing message for internal faults
pub const INTERNAL_ERROR_MESSAGE: &str = "Une erreur interne est survenue";

/// A single field-level schema violation
///
/// The path identifies the offending field as a sequence of segments from the
/// root of the validated value. Serialized responses join the segments with
/// `.`; a root-level violation has an empty path and joins to `""`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: Vec<String>,
    pub message: String,
}

impl FieldError {
    pub fn new(path: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// A violation at the root of the validated value (empty path)
    pub fn root(message: impl Into<String>) -> Self {
        Self::new(Vec::new(), message)
    }

    /// A violation on a top-level field
    pub fn field(name: &str, message: impl Into<String>) -> Self {
        Self::new(vec![name.to_string()], message)
    }

    /// Join the path segments with `.` (empty path yields `""`)
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.dotted_path(), self.message)
        }
    }
}

/// One entry of the `details` array in a rejection response
#[derive(Debug, Serialize)]
pub struct RejectionDetail {
    pub path: String,
    pub message: String,
}

/// Response body for schema rejections
///
/// Every schema violation answers with this exact shape, regardless of which
/// data source or field failed.
#[derive(Debug, Serialize)]
pub struct RejectionBody {
    pub success: bool,
    pub error: String,
    pub details: Vec<RejectionDetail>,
}

/// The structured 400 response for requests that fail their declared schema
///
/// `details` preserves the order in which the schema engine reported the
/// violations.
#[derive(Debug)]
pub struct ValidationRejection {
    pub details: Vec<FieldError>,
}

impl ValidationRejection {
    pub fn new(details: Vec<FieldError>) -> Self {
        Self { details }
    }

    /// Build the serializable response body
    pub fn body(&self) -> RejectionBody {
        RejectionBody {
            success: false,
            error: VALIDATION_FAILED_MESSAGE.to_string(),
            details: self
                .details
                .iter()
                .map(|e| RejectionDetail {
                    path: e.dotted_path(),
                    message: e.message.clone(),
                })
                .collect(),
        }
    }
}

impl fmt::Display for ValidationRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msgs: Vec<String> = self.details.iter().map(|e| e.to_string()).collect();
        write!(f, "Validation failed: {}", msgs.join(", "))
    }
}

impl std::error::Error for ValidationRejection {}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self.body())).into_response()
    }
}

/// The main error type for the livra middleware
#[derive(Debug)]
pub enum LivraError {
    /// The input failed its declared schema (400)
    Validation(Vec<FieldError>),

    /// Unexpected fault; message is logged but never returned to the client (500)
    Internal(anyhow::Error),
}

impl LivraError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            LivraError::Validation(_) => StatusCode::BAD_REQUEST,
            LivraError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for LivraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LivraError::Validation(errors) => {
                let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                write!(f, "Validation failed: {}", msgs.join(", "))
            }
            LivraError::Internal(err) => write!(f, "Internal error: {}", err),
        }
    }
}

impl std::error::Error for LivraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LivraError::Validation(_) => None,
            LivraError::Internal(err) => Some(err.as_ref()),
        }
    }
}

impl IntoResponse for LivraError {
    fn into_response(self) -> Response {
        match self {
            LivraError::Validation(errors) => ValidationRejection::new(errors).into_response(),
            LivraError::Internal(err) => {
                tracing::error!(error = %err, "internal fault during request validation");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": INTERNAL_ERROR_MESSAGE,
                    })),
                )
                    .into_response()
            }
        }
    }
}
