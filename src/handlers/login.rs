use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::LoginError;
use crate::router::LoginState;
use crate::service::login;
use crate::types::login::{
    FIELDS_REQUIRED_MESSAGE, LoginRequest, LoginResponse, METHOD_NOT_ALLOWED_MESSAGE,
};

/// /api/loginParent -> checks a student id and contact number against the directory.
///
/// Every method is routed here; anything but POST is answered with 405
/// whatever the body. Failed logins are still 200 with `success: false`.
pub async fn parent_login_handler(
    State(state): State<LoginState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, LoginError> {
    if method != Method::POST {
        return Ok((
            StatusCode::METHOD_NOT_ALLOWED,
            Json(LoginResponse::failure(METHOD_NOT_ALLOWED_MESSAGE)),
        )
            .into_response());
    }

    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            debug!(error = %rejection, "unreadable login request body");
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(LoginResponse::failure(FIELDS_REQUIRED_MESSAGE)),
            )
                .into_response());
        }
    };

    let request = match LoginRequest::from_body(&body) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "rejecting login request");
            return Ok(e.into_response());
        }
    };

    let outcome = login::authenticate(state.directory.as_ref(), &request).await?;
    Ok((StatusCode::OK, Json(LoginResponse::from(outcome))).into_response())
}
