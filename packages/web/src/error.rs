//! JSON error responses for the API routes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use maganghub_core::MagangError;

#[derive(Debug, Error)]
pub enum WebError {
    #[error(transparent)]
    Core(#[from] MagangError),

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Core(e) => match e {
                MagangError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                MagangError::NotFound(_) => StatusCode::NOT_FOUND,
                MagangError::Http(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
                MagangError::RemoteService { .. }
                | MagangError::MalformedResponse(_)
                | MagangError::Http(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        // Remote payloads are passed through so callers can see what the API said.
        let body = match &self {
            Self::Core(MagangError::RemoteService { status: upstream, body }) => json!({
                "error": "remote service error",
                "upstream_status": upstream,
                "upstream_body": body,
            }),
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
