//! Bearer-token guard for the admin API.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use http::request::Parts;
use serde_json::json;

use crate::errors::AdminError;
use crate::http::AppState;

/// Extractor that only succeeds when the request carries
/// `Authorization: Bearer <ADMIN_TOKEN>`.
///
/// ```ignore
/// async fn handler(_admin: AdminAuth, State(state): State<AppState>) { /* ... */ }
/// ```
#[derive(Clone, Copy, Debug)]
pub struct AdminAuth;

/// Create a standard OAuth 2.0 style error response
pub(crate) fn create_error_response(
    status: StatusCode,
    error: &str,
    error_description: &str,
) -> Response {
    let body = json!({
        "error": error,
        "error_description": error_description
    });

    (status, axum::Json(body)).into_response()
}

impl<S> FromRequestParts<S> for AdminAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let presented = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim);

        match presented {
            Some(token) if app_state.config.admin_token.matches(token) => Ok(AdminAuth),
            _ => {
                tracing::warn!("rejected admin request without a valid bearer token");
                Err(create_error_response(
                    StatusCode::UNAUTHORIZED,
                    "unauthorized",
                    &AdminError::Unauthorized.to_string(),
                ))
            }
        }
    }
}
