//! Student lookup: the directory trait, its backends, and the process-wide handle.
//!
//! Layout:
//! - `models.rs`: the student record as read from either backend
//! - `schema.rs`: SQL DDL for the local SQLite document store
//! - `sqlite.rs`: SQLite-backed directory for local runs and tests
//! - `firestore.rs`: Firestore REST directory used in production

pub mod firestore;
pub mod models;
pub mod schema;
pub mod sqlite;

pub use firestore::FirestoreDirectory;
pub use models::StudentRecord;
pub use sqlite::StudentsStorage;

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::config::{Backend, Config};
use crate::error::LoginError;
use crate::service::student_loader;

/// Minimal query capability the login flow needs from a document store.
#[async_trait]
pub trait StudentDirectory: Send + Sync {
    /// Every record whose `student_id` equals `student_id` exactly, in the
    /// store's stable document order.
    async fn find_by_student_id(
        &self,
        student_id: &str,
    ) -> Result<Vec<StudentRecord>, LoginError>;
}

pub type SharedDirectory = Arc<dyn StudentDirectory>;

static DIRECTORY: OnceCell<SharedDirectory> = OnceCell::const_new();

/// Process-wide directory, created on first use. Concurrent first callers
/// wait on the same initialization.
pub async fn shared(cfg: &Config) -> Result<SharedDirectory, LoginError> {
    DIRECTORY.get_or_try_init(|| connect(cfg)).await.cloned()
}

/// Build a fresh directory for the configured backend.
pub async fn connect(cfg: &Config) -> Result<SharedDirectory, LoginError> {
    match cfg.backend {
        Backend::Firestore => {
            let directory = FirestoreDirectory::from_config(cfg)?;
            info!(
                project_id = %directory.project_id(),
                emulator = cfg.emulator_host.is_some(),
                "Firestore directory initialized"
            );
            Ok(Arc::new(directory))
        }
        Backend::Sqlite => {
            let storage = StudentsStorage::connect(&cfg.database_url).await?;
            storage.init_schema().await?;

            if let Some(seed_path) = cfg.seed_path.as_ref() {
                match student_loader::load_from_file(seed_path) {
                    Ok(records) if !records.is_empty() => {
                        let count = records.len();
                        storage.upsert_many(records).await?;
                        info!(path = %seed_path.display(), count, "seeded student records");
                    }
                    Ok(_) => {
                        info!(path = %seed_path.display(), "no student records to seed");
                    }
                    Err(e) => {
                        warn!(
                            path = %seed_path.display(),
                            error = %e,
                            "failed to load student seed file"
                        );
                    }
                }
            }

            info!(database_url = %cfg.database_url, "SQLite directory initialized");
            Ok(Arc::new(storage))
        }
    }
}
