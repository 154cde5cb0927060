use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::{fmt, net::SocketAddr, path::PathBuf};

/// Environment variable holding the JSON-encoded service account.
pub const SERVICE_ACCOUNT_ENV: &str = "FIREBASE_SERVICE_ACCOUNT";

/// Collection holding one document per enrolled student.
pub const STUDENTS_COLLECTION: &str = "students";

/// OAuth2 scope granting read access to Firestore.
pub const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

pub const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Route served by the login handler.
pub const LOGIN_ROUTE: &str = "/api/loginParent";

/// Which document store answers student lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Firestore,
    Sqlite,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Firestore => f.write_str("firestore"),
            Backend::Sqlite => f.write_str("sqlite"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub loglevel: String,
    pub backend: Backend,
    /// SQLite URL used by the local backend.
    pub database_url: String,
    /// Optional JSON file of student records loaded into the local backend at startup.
    pub seed_path: Option<PathBuf>,
    /// Firestore REST root, e.g. `https://firestore.googleapis.com/v1`.
    pub firestore_base_url: String,
    /// `host:port` of a Firestore emulator; bypasses service-account auth.
    pub emulator_host: Option<String>,
    /// Overrides the service account's `project_id`.
    pub project_id: Option<String>,
    pub database_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            loglevel: "info".to_string(),
            backend: Backend::Firestore,
            database_url: "sqlite:students.db".to_string(),
            seed_path: None,
            firestore_base_url: FIRESTORE_BASE_URL.to_string(),
            emulator_host: None,
            project_id: None,
            database_id: "(default)".to_string(),
        }
    }
}

impl Config {
    /// Defaults, then `FIRESTORE_EMULATOR_HOST`, then `PARENT_LOGIN_*` variables.
    pub fn load() -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(
                Env::raw()
                    .only(&["FIRESTORE_EMULATOR_HOST"])
                    .map(|_| "emulator_host".into()),
            )
            .merge(Env::prefixed("PARENT_LOGIN_"))
            .extract()
    }
}
