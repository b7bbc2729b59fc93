//! Errors returned to HTTP clients.

use hyper::StatusCode;
use serde_json::json;
use thiserror::Error;

/// Errors a request handler can produce.
///
/// Each variant maps to one HTTP status and renders as
/// `{"status": "error", "message": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body is not valid JSON.
    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A required field is absent from the JSON body.
    #[error("Missing {0}")]
    MissingField(String),

    /// No route matches the path.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The path exists but not for this method.
    #[error("Method {method} not allowed for {path}")]
    MethodNotAllowed { method: String, path: String },

    /// A static asset could not be read.
    #[error("Failed to read asset {name}: {source}")]
    Asset {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The request body could not be read from the connection.
    #[error("Failed to read request body: {0}")]
    Body(String),
}

impl ApiError {
    /// Convenience for a single missing field.
    pub fn missing(field: &str) -> Self {
        ApiError::MissingField(format!("\"{}\" parameter", field))
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson(_) | ApiError::MissingField(_) | ApiError::Body(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Asset { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                StatusCode::NOT_FOUND
            }
            ApiError::Asset { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON error payload.
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "status": "error",
            "message": self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn client_errors_map_to_bad_request() {
        assert_eq!(ApiError::missing("enabled").status(), StatusCode::BAD_REQUEST);
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(ApiError::from(parse).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_field_message_names_the_field() {
        let err = ApiError::missing("enabled");
        assert_eq!(err.to_string(), "Missing \"enabled\" parameter");
        assert_eq!(err.to_json()["status"], "error");
        assert_eq!(err.to_json()["message"], "Missing \"enabled\" parameter");
    }

    #[test]
    fn missing_asset_is_not_found_other_io_is_internal() {
        let missing = ApiError::Asset {
            name: "haarcascade_eye.xml".to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let denied = ApiError::Asset {
            name: "haarcascade_eye.xml".to_string(),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(denied.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn method_not_allowed_status() {
        let err = ApiError::MethodNotAllowed {
            method: "GET".to_string(),
            path: "/api/toggle-background".to_string(),
        };
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
