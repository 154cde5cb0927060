use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::service_account::ServiceAccount;
use crate::config::DATASTORE_SCOPE;
use crate::error::LoginError;
use crate::types::firestore::TokenResponse;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const EXPIRY_SKEW_SECS: i64 = 60;

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Clone)]
struct AccessToken {
    token: String,
    expiry: DateTime<Utc>,
}

impl AccessToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_SKEW_SECS) < self.expiry
    }
}

/// Mints Firestore access tokens from a service account via the OAuth2
/// JWT-bearer grant. Tokens are reused until shortly before expiry.
pub struct TokenSource {
    account: ServiceAccount,
    key: EncodingKey,
    http: reqwest::Client,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenSource {
    pub fn new(account: ServiceAccount, http: reqwest::Client) -> Result<Self, LoginError> {
        let key = EncodingKey::from_rsa_pem(account.private_key.as_bytes())?;
        Ok(Self {
            account,
            key,
            http,
            cached: Mutex::new(None),
        })
    }

    /// A bearer token valid for at least the next minute.
    pub async fn access_token(&self) -> Result<String, LoginError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref()
            && token.is_fresh(Utc::now())
        {
            return Ok(token.token.clone());
        }

        let fresh = self.exchange().await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }

    fn assertion(&self, now: DateTime<Utc>) -> Result<String, LoginError> {
        let iat = now.timestamp();
        let claims = AssertionClaims {
            iss: &self.account.client_email,
            scope: DATASTORE_SCOPE,
            aud: &self.account.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.account.private_key_id.clone();
        Ok(encode(&header, &claims, &self.key)?)
    }

    async fn exchange(&self) -> Result<AccessToken, LoginError> {
        let now = Utc::now();
        let assertion = self.assertion(now)?;

        let resp = self
            .http
            .post(self.account.token_uri.as_str())
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LoginError::TokenEndpoint { status, body });
        }

        let payload: TokenResponse = resp.json().await?;
        debug!(token_type = ?payload.token_type, "token endpoint responded");
        let lifetime = payload.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS);
        info!(
            client_email = %self.account.client_email,
            expires_in = lifetime,
            "Firestore access token refreshed"
        );
        Ok(AccessToken {
            token: payload.access_token,
            expiry: now + Duration::seconds(lifetime),
        })
    }
}
