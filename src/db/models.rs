use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use subtle::{Choice, ConstantTimeEq};

/// A student document. Owned by the document store; the login flow only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct StudentRecord {
    #[serde(rename = "id")]
    pub doc_id: String,
    pub student_id: String,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(rename = "guardianContact", default)]
    pub guardian_contact: Option<String>,
}

impl StudentRecord {
    /// Whether `supplied` equals the primary or guardian contact exactly.
    /// Stored values are compared as-is, without trimming.
    pub fn accepts_contact(&self, supplied: &str) -> bool {
        [self.contact.as_deref(), self.guardian_contact.as_deref()]
            .into_iter()
            .flatten()
            .fold(Choice::from(0), |acc, stored| {
                acc | stored.as_bytes().ct_eq(supplied.as_bytes())
            })
            .into()
    }
}
