// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types and handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("Backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Floor plan error: {0}")]
    Geometry(#[from] navme_floorplan::Error),

    /// A create/update/delete failed; wraps the underlying cause.
    #[error("Failed to {action}: {source}")]
    Mutation {
        action: &'static str,
        #[source]
        source: Box<ApiError>,
    },

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Wrap as a failed mutation, e.g. `"Failed to add: ..."`.
    pub fn during(self, action: &'static str) -> Self {
        ApiError::Mutation {
            action,
            source: Box::new(self),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Backend { status, .. } => match StatusCode::from_u16(*status) {
                Ok(s) if s.is_client_error() => s,
                _ => StatusCode::BAD_GATEWAY,
            },
            ApiError::Transport(_) => StatusCode::BAD_GATEWAY,
            ApiError::UnknownTable(_) | ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) | ApiError::Geometry(_) => StatusCode::BAD_REQUEST,
            ApiError::Mutation { source, .. } => source.status(),
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Backend { .. } => "BACKEND_ERROR",
            ApiError::Transport(_) => "BACKEND_UNREACHABLE",
            ApiError::UnknownTable(_) => "UNKNOWN_TABLE",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Geometry(_) => "GEOMETRY_ERROR",
            ApiError::Mutation { source, .. } => source.code(),
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.code(), "Request failed");
        } else {
            tracing::debug!(error = %self, code = self.code(), "Request rejected");
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_message_and_status() {
        let err = ApiError::Backend {
            status: 409,
            message: "duplicate key value".into(),
        }
        .during("add");
        assert_eq!(err.to_string(), "Failed to add: duplicate key value");
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "BACKEND_ERROR");
    }

    #[test]
    fn test_backend_server_error_maps_to_bad_gateway() {
        let err = ApiError::Backend {
            status: 503,
            message: "unavailable".into(),
        };
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_geometry_is_bad_request() {
        let err: ApiError = navme_floorplan::Error::CanvasTooSmall {
            width: 10.0,
            height: 10.0,
        }
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "GEOMETRY_ERROR");
    }
}
