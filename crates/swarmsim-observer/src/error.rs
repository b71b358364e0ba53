//! Error types for the operator API server.
//!
//! [`ObserverError`] wraps simulation rejections and converts them into
//! an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use swarmsim_core::error::SimError;

/// Errors that can occur in the operator API layer.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// The simulation rejected the command.
    #[error(transparent)]
    Simulation(#[from] SimError),
}

impl ObserverError {
    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Simulation(SimError::NotRunning | SimError::OperationNotAllowed { .. }) => {
                StatusCode::CONFLICT
            }
            Self::Simulation(SimError::UnknownAgent { .. }) => StatusCode::NOT_FOUND,
            Self::Simulation(SimError::InvalidInput { .. }) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_simulation_rejection_is_a_client_error() {
        let cases = [
            (SimError::NotRunning, StatusCode::CONFLICT),
            (
                SimError::OperationNotAllowed { operation: "reset" },
                StatusCode::CONFLICT,
            ),
            (
                SimError::UnknownAgent {
                    identifier: String::from("-3"),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                SimError::InvalidInput {
                    reason: String::from("x out of range"),
                },
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (error, expected) in cases {
            let status = ObserverError::from(error).status();
            assert_eq!(status, expected);
            assert!(status.is_client_error());
        }
    }
}
