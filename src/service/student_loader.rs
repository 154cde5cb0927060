use crate::db::models::StudentRecord;
use crate::error::LoginError;
use std::{fs, path::Path};
use tracing::info;

/// Load student records from a JSON array file for the local backend.
/// A missing file yields no records.
pub fn load_from_file(path: &Path) -> Result<Vec<StudentRecord>, LoginError> {
    if !path.exists() {
        info!(path = %path.display(), "student seed file not found; skipping load");
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(path)?;
    let records: Vec<StudentRecord> = serde_json::from_str(&contents)?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(tag: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!(
            "parent-login-seed-{tag}-{}-{}.json",
            std::process::id(),
            nanos
        ));
        path
    }

    #[test]
    fn missing_file_is_empty() {
        let records = load_from_file(&temp_path("missing")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn loads_records_and_rejects_garbage() {
        let path = temp_path("ok");
        fs::write(
            &path,
            r#"[{"id":"doc42","student_id":"XY9","contact":"0171234567","guardianContact":"0179999999"},
                {"id":"doc7","student_id":"AB123"}]"#,
        )
        .unwrap();
        let records = load_from_file(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].contact, None);
        let _ = fs::remove_file(&path);

        let path = temp_path("bad");
        fs::write(&path, "{oops").unwrap();
        assert!(matches!(load_from_file(&path), Err(LoginError::Json(_))));
        let _ = fs::remove_file(&path);
    }
}
