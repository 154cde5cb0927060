use crate::db::StudentDirectory;
use crate::db::models::StudentRecord;
use crate::db::schema::SQLITE_INIT;
use crate::error::LoginError;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

const UPSERT_STUDENT: &str = r#"
    INSERT INTO students (doc_id, student_id, contact, guardian_contact)
    VALUES (?, ?, ?, ?)
    ON CONFLICT(doc_id) DO UPDATE SET
        student_id=excluded.student_id,
        contact=excluded.contact,
        guardian_contact=excluded.guardian_contact
"#;

#[derive(Clone)]
pub struct StudentsStorage {
    pool: SqlitePool,
}

impl StudentsStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, LoginError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        Ok(Self::new(pool))
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), LoginError> {
        // sqlx::query runs a single statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert or replace one record by `doc_id`.
    pub async fn upsert(&self, record: StudentRecord) -> Result<(), LoginError> {
        sqlx::query(UPSERT_STUDENT)
            .bind(record.doc_id)
            .bind(record.student_id)
            .bind(record.contact)
            .bind(record.guardian_contact)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Batch upsert using a single transaction.
    pub async fn upsert_many(&self, records: Vec<StudentRecord>) -> Result<(), LoginError> {
        let mut tx = self.pool.begin().await?;

        for record in records.into_iter() {
            sqlx::query(UPSERT_STUDENT)
                .bind(record.doc_id)
                .bind(record.student_id)
                .bind(record.contact)
                .bind(record.guardian_contact)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn find_by_student_id(
        &self,
        student_id: &str,
    ) -> Result<Vec<StudentRecord>, LoginError> {
        let rows = sqlx::query_as::<_, StudentRecord>(
            r#"SELECT doc_id, student_id, contact, guardian_contact
               FROM students WHERE student_id = ? ORDER BY doc_id"#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl StudentDirectory for StudentsStorage {
    async fn find_by_student_id(
        &self,
        student_id: &str,
    ) -> Result<Vec<StudentRecord>, LoginError> {
        StudentsStorage::find_by_student_id(self, student_id).await
    }
}
