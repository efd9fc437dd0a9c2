//! Request extractors that report failures as [`ServerError`]s.

use std::time::Duration;

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request, rejection::JsonRejection},
    http::request::Parts,
};
use engine::QueryContext;
use uuid::Uuid;

use crate::ServerError;

/// Optional per-request deadline, in milliseconds.
pub const REQUEST_TIMEOUT_HEADER: &str = "x-request-timeout-ms";

/// JSON body; any decode failure is a 400 with the standard error body.
pub(crate) struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ServerError::BadRequest(format!(
                "invalid JSON body: {}",
                rejection.body_text()
            ))),
        }
    }
}

/// Storage deadline of the request.
///
/// Without the `x-request-timeout-ms` header only the repository bound
/// applies.
pub(crate) struct RequestContext(pub QueryContext);

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(REQUEST_TIMEOUT_HEADER) else {
            return Ok(Self(QueryContext::background()));
        };
        let millis: u64 = value
            .to_str()
            .ok()
            .and_then(|value| value.trim().parse().ok())
            .ok_or_else(|| {
                ServerError::BadRequest(format!("invalid {REQUEST_TIMEOUT_HEADER} header"))
            })?;

        Ok(Self(QueryContext::with_timeout(Duration::from_millis(millis))))
    }
}

/// Parse a required uuid path segment.
pub(crate) fn parse_path_uuid(raw: &str, label: &str) -> Result<Uuid, ServerError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ServerError::BadRequest(format!("{label} must not be empty")));
    }
    Uuid::parse_str(raw).map_err(|_| ServerError::BadRequest(format!("{label} is not a valid uuid")))
}
