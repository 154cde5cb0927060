use axum::{Json, http::StatusCode, response::IntoResponse};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

use crate::types::login::LoginResponse;

pub const INTERNAL_ERROR_MESSAGE: &str =
    "An internal server error occurred. Please try again later.";

/// Unexpected failures. Every variant surfaces to the caller as the same
/// generic 500; detail stays in the server log.
#[derive(Debug, ThisError)]
pub enum LoginError {
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("JWT signing error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Service account error: {0}")]
    ServiceAccount(String),

    #[error("Token endpoint returned {status}: {body}")]
    TokenEndpoint { status: StatusCode, body: String },

    #[error("Firestore returned {status}: {body}")]
    UpstreamStatus { status: StatusCode, body: String },

    #[error("Malformed Firestore document: {0}")]
    MalformedDocument(String),
}

impl IntoResponse for LoginError {
    fn into_response(self) -> axum::response::Response {
        error!(error = %self, "Internal Server Error");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(LoginResponse::failure(INTERNAL_ERROR_MESSAGE)),
        )
            .into_response()
    }
}
