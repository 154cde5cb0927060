use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error as ThisError;

pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method Not Allowed";
pub const FIELDS_REQUIRED_MESSAGE: &str = "Student ID and Contact Number are required.";
pub const STUDENT_NOT_FOUND_MESSAGE: &str = "Student ID not found.";
pub const CONTACT_MISMATCH_MESSAGE: &str = "Contact number does not match registered details.";

/// Raw body as posted by the login form. Values stay untyped until validated.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[serde(default)]
    pub student_id: Option<Value>,
    #[serde(default)]
    pub contact_number: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    StudentId,
    ContactNumber,
}

impl fmt::Display for LoginField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginField::StudentId => f.write_str("studentId"),
            LoginField::ContactNumber => f.write_str("contactNumber"),
        }
    }
}

/// Fields that were absent, null, non-string, or blank.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("missing or invalid field(s): {}", field_list(.missing))]
pub struct LoginValidationError {
    pub missing: Vec<LoginField>,
}

fn field_list(fields: &[LoginField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl IntoResponse for LoginValidationError {
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::BAD_REQUEST,
            Json(LoginResponse::failure(FIELDS_REQUIRED_MESSAGE)),
        )
            .into_response()
    }
}

/// A validated login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    /// Trimmed and uppercased.
    pub student_id: String,
    /// Trimmed.
    pub contact_number: String,
}

impl LoginRequest {
    /// Validate a raw request body. A body that is not a JSON object is
    /// treated as if both fields were missing.
    pub fn from_body(body: &[u8]) -> Result<Self, LoginValidationError> {
        let payload = match serde_json::from_slice::<Value>(body) {
            Ok(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_default(),
            _ => LoginPayload::default(),
        };
        Self::try_from(payload)
    }
}

impl TryFrom<LoginPayload> for LoginRequest {
    type Error = LoginValidationError;

    fn try_from(payload: LoginPayload) -> Result<Self, Self::Error> {
        let student_id = non_blank(payload.student_id.as_ref());
        let contact_number = non_blank(payload.contact_number.as_ref());

        match (student_id, contact_number) {
            (Some(student_id), Some(contact_number)) => Ok(Self {
                student_id: student_id.to_uppercase(),
                contact_number: contact_number.to_string(),
            }),
            (student_id, contact_number) => {
                let mut missing = Vec::with_capacity(2);
                if student_id.is_none() {
                    missing.push(LoginField::StudentId);
                }
                if contact_number.is_none() {
                    missing.push(LoginField::ContactNumber);
                }
                Err(LoginValidationError { missing })
            }
        }
    }
}

fn non_blank(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(trim_form_whitespace)
        .filter(|s| !s.is_empty())
}

/// Trim the same set as JavaScript's `String.prototype.trim`: Unicode
/// `White_Space` plus the byte-order mark, minus NEXT LINE (U+0085).
pub fn trim_form_whitespace(s: &str) -> &str {
    s.trim_matches(|c: char| c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{0085}'))
}

/// Result of checking a validated request against the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Authorized { doc_id: String },
    StudentNotFound,
    ContactMismatch,
}

/// JSON body returned for every outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(rename = "docId", default, skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LoginResponse {
    pub fn authorized(doc_id: impl Into<String>) -> Self {
        Self {
            success: true,
            doc_id: Some(doc_id.into()),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            doc_id: None,
            message: Some(message.into()),
        }
    }
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        match outcome {
            LoginOutcome::Authorized { doc_id } => LoginResponse::authorized(doc_id),
            LoginOutcome::StudentNotFound => LoginResponse::failure(STUDENT_NOT_FOUND_MESSAGE),
            LoginOutcome::ContactMismatch => LoginResponse::failure(CONTACT_MISMATCH_MESSAGE),
        }
    }
}
