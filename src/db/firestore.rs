use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::{Config, STUDENTS_COLLECTION};
use crate::credentials::{ServiceAccount, TokenSource};
use crate::db::StudentDirectory;
use crate::db::models::StudentRecord;
use crate::error::LoginError;
use crate::types::firestore::{Document, RunQueryRequest, RunQueryResponseItem};

/// Bearer token the Firestore emulator accepts in place of real credentials.
const EMULATOR_TOKEN: &str = "owner";

enum FirestoreAuth {
    Emulator,
    ServiceAccount(TokenSource),
}

impl FirestoreAuth {
    async fn bearer(&self) -> Result<String, LoginError> {
        match self {
            FirestoreAuth::Emulator => Ok(EMULATOR_TOKEN.to_string()),
            FirestoreAuth::ServiceAccount(source) => source.access_token().await,
        }
    }
}

/// Read-only Firestore client issuing `runQuery` against the REST API.
pub struct FirestoreDirectory {
    http: reqwest::Client,
    project_id: String,
    run_query_url: Url,
    auth: FirestoreAuth,
}

impl FirestoreDirectory {
    /// Build the client from configuration. Outside the emulator the service
    /// account must be present in the environment and well formed.
    pub fn from_config(cfg: &Config) -> Result<Self, LoginError> {
        match cfg.emulator_host.as_deref() {
            Some(host) => Self::emulator(cfg, host, ServiceAccount::from_env().ok()),
            None => Self::with_service_account(cfg, ServiceAccount::from_env()?),
        }
    }

    /// Production client authenticating as `account`.
    pub fn with_service_account(cfg: &Config, account: ServiceAccount) -> Result<Self, LoginError> {
        let project_id = cfg
            .project_id
            .clone()
            .unwrap_or_else(|| account.project_id.clone());
        let http = build_http_client(reqwest::Client::builder())?;
        let run_query_url = run_query_url(&cfg.firestore_base_url, &project_id, &cfg.database_id)?;
        let auth = FirestoreAuth::ServiceAccount(TokenSource::new(account, http.clone())?);
        Ok(Self {
            http,
            project_id,
            run_query_url,
            auth,
        })
    }

    /// Client for a local emulator at `host`; credentials are only consulted
    /// for the project id. System proxies are bypassed.
    pub fn emulator(
        cfg: &Config,
        host: &str,
        account: Option<ServiceAccount>,
    ) -> Result<Self, LoginError> {
        let project_id = cfg
            .project_id
            .clone()
            .or_else(|| account.map(|a| a.project_id))
            .ok_or_else(|| {
                LoginError::ServiceAccount("no project_id configured for Firestore".to_string())
            })?;
        let run_query_url =
            run_query_url(&format!("http://{host}/v1"), &project_id, &cfg.database_id)?;
        Ok(Self {
            http: build_http_client(reqwest::Client::builder().no_proxy())?,
            project_id,
            run_query_url,
            auth: FirestoreAuth::Emulator,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn run_query_url(&self) -> &Url {
        &self.run_query_url
    }
}

fn build_http_client(builder: reqwest::ClientBuilder) -> Result<reqwest::Client, LoginError> {
    Ok(builder
        .user_agent(concat!("parent-login/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(15))
        .build()?)
}

fn run_query_url(base: &str, project_id: &str, database_id: &str) -> Result<Url, LoginError> {
    let base = base.trim_end_matches('/');
    Ok(Url::parse(&format!(
        "{base}/projects/{project_id}/databases/{database_id}/documents:runQuery"
    ))?)
}

impl TryFrom<Document> for StudentRecord {
    type Error = LoginError;

    fn try_from(doc: Document) -> Result<Self, Self::Error> {
        let doc_id = doc
            .id()
            .ok_or_else(|| LoginError::MalformedDocument(doc.name.clone()))?
            .to_string();
        Ok(StudentRecord {
            student_id: doc.string_field("student_id").unwrap_or_default().to_string(),
            contact: doc.string_field("contact").map(str::to_string),
            guardian_contact: doc.string_field("guardianContact").map(str::to_string),
            doc_id,
        })
    }
}

/// Keep only result-bearing entries of a `runQuery` response.
pub fn records_from_response(
    items: Vec<RunQueryResponseItem>,
) -> Result<Vec<StudentRecord>, LoginError> {
    items
        .into_iter()
        .filter_map(|item| item.document)
        .map(StudentRecord::try_from)
        .collect()
}

#[async_trait]
impl StudentDirectory for FirestoreDirectory {
    async fn find_by_student_id(
        &self,
        student_id: &str,
    ) -> Result<Vec<StudentRecord>, LoginError> {
        let query = RunQueryRequest::field_equals(STUDENTS_COLLECTION, "student_id", student_id);
        let token = self.auth.bearer().await?;

        let resp = self
            .http
            .post(self.run_query_url.clone())
            .bearer_auth(token)
            .json(&query)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LoginError::UpstreamStatus { status, body });
        }

        let items: Vec<RunQueryResponseItem> = resp.json().await?;
        let records = records_from_response(items)?;
        debug!(student_id, matches = records.len(), "Firestore query completed");
        Ok(records)
    }
}
