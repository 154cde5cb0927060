//! SQL DDL for the local student document store.

/// SQLite schema with:
/// - `doc_id` TEXT PRIMARY KEY, the opaque document identifier
/// - `student_id` stored uppercase, not unique (duplicates are tolerated)
/// - `contact` / `guardian_contact` nullable, stored verbatim
/// - index on `student_id` for the equality lookup
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS students (
    doc_id TEXT PRIMARY KEY,
    student_id TEXT NOT NULL,
    contact TEXT NULL,
    guardian_contact TEXT NULL
);

CREATE INDEX IF NOT EXISTS idx_students_student_id ON students(student_id);
"#;
