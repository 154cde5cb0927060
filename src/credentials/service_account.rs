use serde::Deserialize;
use std::fmt;

use crate::config::SERVICE_ACCOUNT_ENV;
use crate::error::LoginError;

const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Service-account key as downloaded from the Firebase console.
#[derive(Clone, Deserialize)]
pub struct ServiceAccount {
    pub project_id: String,
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URI.to_string()
}

impl fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccount {
    pub fn from_json(raw: &str) -> Result<Self, LoginError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Read and parse the service account from the environment.
    pub fn from_env() -> Result<Self, LoginError> {
        let raw = std::env::var(SERVICE_ACCOUNT_ENV).map_err(|e| {
            LoginError::ServiceAccount(format!("{SERVICE_ACCOUNT_ENV} unavailable: {e}"))
        })?;
        Self::from_json(&raw)
    }
}
