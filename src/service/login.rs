use tracing::{info, warn};

use crate::db::StudentDirectory;
use crate::error::LoginError;
use crate::types::login::{LoginOutcome, LoginRequest};

/// Check a validated login attempt against the student directory.
///
/// The first record returned for the normalized student id is authoritative;
/// additional matches are logged and ignored.
pub async fn authenticate(
    directory: &dyn StudentDirectory,
    request: &LoginRequest,
) -> Result<LoginOutcome, LoginError> {
    let matches = directory.find_by_student_id(&request.student_id).await?;

    let Some(record) = matches.first() else {
        info!(student_id = %request.student_id, "login rejected: student id not found");
        return Ok(LoginOutcome::StudentNotFound);
    };

    if matches.len() > 1 {
        warn!(
            student_id = %request.student_id,
            count = matches.len(),
            doc_id = %record.doc_id,
            "multiple student records share this id; using the first"
        );
    }

    if record.accepts_contact(&request.contact_number) {
        info!(student_id = %request.student_id, doc_id = %record.doc_id, "parent login accepted");
        Ok(LoginOutcome::Authorized {
            doc_id: record.doc_id.clone(),
        })
    } else {
        info!(student_id = %request.student_id, "login rejected: contact mismatch");
        Ok(LoginOutcome::ContactMismatch)
    }
}
