//! Integration tests for full directory sync runs against a stub
//! directory server:
//! - First run creates, second run detects no changes
//! - Exactly one sync log entry per run, success or failure
//! - One bad record never aborts the rest of the run

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use frontdesk_db::repositories::{EmployeeRepo, SyncLogRepo};
use frontdesk_directory::{DirectoryClient, EmployeeSyncer};
use serde_json::{json, Value};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Serve a fixed `/crews` response on an ephemeral local port.
async fn spawn_stub(body: Value) -> String {
    let app = Router::new().route(
        "/crews",
        get(move || {
            let body = body.clone();
            async move { Json(body) }
        }),
    );
    serve(app).await
}

/// Serve a `/crews` endpoint that always fails.
async fn spawn_failing_stub() -> String {
    let app = Router::new().route(
        "/crews",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    serve(app).await
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn syncer_for(base_url: String) -> EmployeeSyncer {
    EmployeeSyncer::new(DirectoryClient::new(base_url, "stub-token".to_string()))
}

fn crew(id: &str, last: &str, first: &str, email: &str) -> Value {
    json!({
        "id": id,
        "last_name": last,
        "first_name": first,
        "email": email,
        "emp_status": "employed",
        "department": { "name": "Engineering" }
    })
}

// ---------------------------------------------------------------------------
// Test: Second run detects no changes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_run_is_a_no_op(pool: PgPool) {
    let base_url = spawn_stub(json!({
        "data": [
            crew("E1", "Sato", "Taro", "taro@example.com"),
            crew("E2", "Suzuki", "Hanako", "hanako@example.com"),
        ],
        "meta": {}
    }))
    .await;
    let syncer = syncer_for(base_url);

    let first = syncer.run(&pool).await.unwrap();
    assert_eq!(first.created, 2);
    assert_eq!(first.updated, 0);
    assert_eq!(first.skipped, 0);
    assert!(first.errors.is_empty());

    let second = syncer.run(&pool).await.unwrap();
    assert_eq!(second.created, 0);
    assert_eq!(second.updated, 0, "unchanged records must not be rewritten");
    assert_eq!(second.skipped, 2);

    // One log entry per run.
    let logs = SyncLogRepo::list_recent(&pool, 10).await.unwrap();
    assert_eq!(logs.len(), 2);
    assert!(logs.iter().all(|l| l.status == "success"));
    assert!(logs.iter().any(|l| l.details["skipped"] == 2));
}

// ---------------------------------------------------------------------------
// Test: One bad record never aborts the rest
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bad_record_is_isolated(pool: PgPool) {
    // E2 collides with E1 on the case-insensitive email constraint.
    let base_url = spawn_stub(json!({
        "data": [
            crew("E1", "Sato", "Taro", "shared@example.com"),
            crew("E2", "Suzuki", "Hanako", "SHARED@example.com"),
            crew("E3", "Tanaka", "Jiro", "jiro@example.com"),
        ],
        "meta": {}
    }))
    .await;

    let stats = syncer_for(base_url).run(&pool).await.unwrap();

    assert_eq!(stats.created, 2, "records after the bad one still apply");
    assert_eq!(stats.errors.len(), 1);
    assert!(stats.errors[0].starts_with("Employee E2:"));

    assert!(EmployeeRepo::find_by_external_id(&pool, "E1")
        .await
        .unwrap()
        .is_some());
    assert!(EmployeeRepo::find_by_external_id(&pool, "E3")
        .await
        .unwrap()
        .is_some());

    // Still a success run, with the error recorded in the details.
    let logs = SyncLogRepo::list_recent(&pool, 10).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].status, "success");
    assert_eq!(logs[0].details["errors"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: A failed fetch still writes its log entry
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_fetch_writes_failed_log(pool: PgPool) {
    let base_url = spawn_failing_stub().await;

    let result = syncer_for(base_url).run(&pool).await;
    assert!(result.is_err());

    let logs = SyncLogRepo::list_recent(&pool, 10).await.unwrap();
    assert_eq!(logs.len(), 1, "exactly one log entry per run");
    assert_eq!(logs[0].status, "failed");
    assert_eq!(logs[0].details["created"], 0);
    assert!(logs[0].error_message.is_some());
}
