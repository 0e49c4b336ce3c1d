//! Credential relay in front of the ledger store.
//!
//! Clients post the usual `{action, data}` envelope to `/api/gs`; the relay
//! adds the store token from its own configuration and forwards the request,
//! so the credential never reaches the client.

use api_types::action::Status;
use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

pub use relay::{RelayConfig, router, run_with_listener, spawn_with_listener};

mod relay;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Missing env vars")]
    MissingConfig,
    #[error("{0}")]
    Upstream(#[from] reqwest::Error),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::MissingConfig | RelayError::Upstream(_) | RelayError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            tracing::error!("relay failed: {self}");
        }

        let body = Status {
            ok: false,
            error: Some(self.to_string()),
        };
        (status, Json(body)).into_response()
    }
}
