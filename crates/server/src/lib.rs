use api_types::ErrorBody;
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use extract::REQUEST_TIMEOUT_HEADER;
pub use server::{ServerState, router, run_with_listener};

mod categories;
mod extract;
mod operations;
mod server;

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    /// The request could not be decoded or is missing required parts.
    BadRequest(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) | EngineError::ExistingKey(_) => StatusCode::BAD_REQUEST,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Conflict(_) => StatusCode::CONFLICT,
        EngineError::DomainLogic(_) => StatusCode::IM_A_TEAPOT,
        EngineError::Timeout(_) | EngineError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, kind, message) = match self {
            ServerError::Engine(err) => {
                let status = status_for_engine_error(&err);
                if status.is_server_error() {
                    tracing::error!("request failed: {err}");
                    (status, err.kind(), "internal server error".to_string())
                } else {
                    tracing::error!("request rejected: {err}");
                    (status, err.kind(), err.message().to_string())
                }
            }
            ServerError::BadRequest(message) => {
                tracing::error!("bad request: {message}");
                (StatusCode::BAD_REQUEST, "bad_request", message)
            }
        };

        let body = ErrorBody {
            kind: kind.to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
