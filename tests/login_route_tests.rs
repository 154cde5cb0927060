use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use parent_login::{
    LoginError, StudentDirectory,
    db::{StudentRecord, StudentsStorage},
    router::{LoginState, login_router},
    types::login::LoginResponse,
};
use std::{
    fs,
    path::PathBuf,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

const ROUTE: &str = "/api/loginParent";

struct TestApp {
    app: Router,
    db_path: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.db_path);
    }
}

async fn spawn_app(records: Vec<StudentRecord>) -> TestApp {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut db_path = std::env::temp_dir();
    db_path.push(format!(
        "parent-login-route-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));

    let database_url = format!("sqlite:{}", db_path.display());
    let storage = StudentsStorage::connect(&database_url)
        .await
        .expect("failed to open sqlite store");
    storage.init_schema().await.expect("failed to init schema");
    storage
        .upsert_many(records)
        .await
        .expect("failed to seed students");

    let app = login_router(LoginState::new(Arc::new(storage)));
    TestApp { app, db_path }
}

fn xy9() -> StudentRecord {
    StudentRecord {
        doc_id: "doc42".to_string(),
        student_id: "XY9".to_string(),
        contact: Some("0171234567".to_string()),
        guardian_contact: Some("0179999999".to_string()),
    }
}

fn ab123() -> StudentRecord {
    StudentRecord {
        doc_id: "doc7".to_string(),
        student_id: "AB123".to_string(),
        contact: Some("555-1234 ".to_string()),
        guardian_contact: None,
    }
}

async fn send(app: &Router, method: &str, body: &str) -> (StatusCode, LoginResponse) {
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(ROUTE)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");

    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let parsed: LoginResponse = serde_json::from_slice(&body).expect("response was not JSON");
    (status, parsed)
}

async fn post(app: &Router, body: &str) -> (StatusCode, LoginResponse) {
    send(app, "POST", body).await
}

#[tokio::test]
async fn non_post_methods_are_rejected() {
    let t = spawn_app(vec![xy9()]).await;
    let valid = r#"{"studentId":"XY9","contactNumber":"0171234567"}"#;

    for method in ["GET", "PUT", "DELETE", "PATCH"] {
        let (status, body) = send(&t.app, method, valid).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(body, LoginResponse::failure("Method Not Allowed"));
    }
}

#[tokio::test]
async fn oversized_bodies_still_get_json_answers() {
    let t = spawn_app(vec![xy9()]).await;
    let oversized = format!(
        r#"{{"studentId":"XY9","contactNumber":"0171234567","pad":"{}"}}"#,
        "a".repeat(3 * 1024 * 1024)
    );

    let (status, body) = send(&t.app, "GET", &oversized).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, LoginResponse::failure("Method Not Allowed"));

    let (status, body) = post(&t.app, &oversized).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        LoginResponse::failure("Student ID and Contact Number are required.")
    );
}

#[tokio::test]
async fn missing_fields_are_a_bad_request() {
    let t = spawn_app(vec![xy9()]).await;

    for body in [
        r#"{}"#,
        r#"{"studentId":"XY9"}"#,
        r#"{"contactNumber":"0171234567"}"#,
        r#"{"studentId":"","contactNumber":"0171234567"}"#,
        r#"{"studentId":"XY9","contactNumber":null}"#,
        "not json",
    ] {
        let (status, resp) = post(&t.app, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(
            resp,
            LoginResponse::failure("Student ID and Contact Number are required.")
        );
    }
}

#[tokio::test]
async fn guardian_contact_logs_in_with_normalized_id() {
    let t = spawn_app(vec![xy9()]).await;
    let (status, body) = post(
        &t.app,
        r#"{"studentId":"xy9","contactNumber":" 0179999999 "}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, LoginResponse::authorized("doc42"));
}

#[tokio::test]
async fn student_id_lookup_ignores_case_and_whitespace() {
    let t = spawn_app(vec![ab123()]).await;
    for student_id in ["  ab123  ", "AB123", "ab123"] {
        let body = format!(r#"{{"studentId":"{student_id}","contactNumber":"555-1234 "}}"#);
        let (status, resp) = post(&t.app, &body).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!resp.success, "{student_id}");
        assert_eq!(
            resp.message.as_deref(),
            Some("Contact number does not match registered details.")
        );
    }
}

#[tokio::test]
async fn stored_contact_is_compared_untrimmed() {
    let t = spawn_app(vec![ab123()]).await;
    let (status, resp) = post(&t.app, r#"{"studentId":"AB123","contactNumber":"555-1234"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        resp,
        LoginResponse::failure("Contact number does not match registered details.")
    );
}

#[tokio::test]
async fn wrong_contact_is_a_logical_failure() {
    let t = spawn_app(vec![xy9()]).await;
    let (status, body) = post(&t.app, r#"{"studentId":"XY9","contactNumber":"0000000000"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        LoginResponse::failure("Contact number does not match registered details.")
    );
}

#[tokio::test]
async fn unknown_student_is_a_logical_failure() {
    let t = spawn_app(vec![xy9()]).await;
    let (status, body) = post(&t.app, r#"{"studentId":"ZZZ","contactNumber":"123"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, LoginResponse::failure("Student ID not found."));
}

struct UnreachableDirectory;

#[async_trait]
impl StudentDirectory for UnreachableDirectory {
    async fn find_by_student_id(
        &self,
        _student_id: &str,
    ) -> Result<Vec<StudentRecord>, LoginError> {
        Err(LoginError::UpstreamStatus {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "backend down: projects/school-portal".to_string(),
        })
    }
}

#[tokio::test]
async fn directory_failure_is_a_generic_internal_error() {
    let app = login_router(LoginState::new(Arc::new(UnreachableDirectory)));

    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(ROUTE)
                .header("content-type", "application/json")
                .body(Body::from(r#"{"studentId":"XY9","contactNumber":"0171234567"}"#))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let body_str = std::str::from_utf8(&body).expect("response body was not utf-8");
    assert!(body_str.contains(
        r#""message":"An internal server error occurred. Please try again later.""#
    ));
    assert!(body_str.contains(r#""success":false"#));
    assert!(!body_str.contains("backend down"));
}
