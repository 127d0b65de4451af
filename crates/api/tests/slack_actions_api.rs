//! Integration tests for the Slack interactivity webhook:
//! - Signature enforcement (missing, stale, wrong secret)
//! - The url_verification handshake
//! - Button clicks driving the visit state machine end to end
//! - Duplicate clicks and unknown actions

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, form_encode_payload, post_signed};
use frontdesk_core::status::VisitStatus;
use frontdesk_db::models::employee::CreateEmployee;
use frontdesk_db::repositories::{DepartmentRepo, EmployeeRepo, VisitRepo};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

const ACTIONS_URI: &str = "/api/v1/slack/actions";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_visit(pool: &PgPool) -> i64 {
    let department = DepartmentRepo::find_or_create(pool, "Engineering")
        .await
        .unwrap();
    let employee = EmployeeRepo::create(
        pool,
        &CreateEmployee {
            name: "Alice".to_string(),
            email: Some("alice@example.com".to_string()),
            slack_user_id: "U0001".to_string(),
            department_id: department.id,
            is_active: true,
            external_id: None,
        },
    )
    .await
    .unwrap();
    VisitRepo::create(pool, employee.id, None).await.unwrap().id
}

fn click_payload(action_id: &str, visit_id: i64) -> String {
    form_encode_payload(&json!({
        "type": "block_actions",
        "actions": [{ "action_id": action_id, "value": visit_id.to_string() }],
        "user": { "id": "U999", "name": "hanako" }
    }))
}

// ---------------------------------------------------------------------------
// Test: Signature enforcement
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn unsigned_request_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let request = Request::builder()
        .method("POST")
        .uri(ACTIONS_URI)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("payload=%7B%7D"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stale_timestamp_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = form_encode_payload(&json!({ "type": "url_verification", "challenge": "x" }));
    let stale = (chrono::Utc::now().timestamp() - 400).to_string();
    let signature =
        frontdesk_core::signature::sign(common::TEST_SIGNING_SECRET, &stale, body.as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri(ACTIONS_URI)
        .header("content-type", "application/x-www-form-urlencoded")
        .header("x-slack-request-timestamp", stale)
        .header("x-slack-signature", signature)
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_secret_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = form_encode_payload(&json!({ "type": "url_verification", "challenge": "x" }));
    let timestamp = chrono::Utc::now().timestamp().to_string();
    let signature = frontdesk_core::signature::sign("some-other-secret", &timestamp, body.as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri(ACTIONS_URI)
        .header("content-type", "application/x-www-form-urlencoded")
        .header("x-slack-request-timestamp", timestamp)
        .header("x-slack-signature", signature)
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Test: url_verification handshake
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn handshake_echoes_challenge(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = form_encode_payload(&json!({
        "type": "url_verification",
        "challenge": "3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P"
    }));
    let response = post_signed(app, ACTIONS_URI, body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json["challenge"],
        "3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P"
    );
}

// ---------------------------------------------------------------------------
// Test: Button clicks drive the state machine
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn click_transitions_visit_and_acknowledges(pool: PgPool) {
    let visit_id = seed_visit(&pool).await;
    let app = common::build_test_app(pool.clone());

    let response = post_signed(app, ACTIONS_URI, click_payload("going_now", visit_id)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["text"], "\u{2713} coming right away");

    let visit = VisitRepo::find(&pool, visit_id).await.unwrap().unwrap();
    assert_eq!(visit.status(), VisitStatus::GoingNow);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_click_reports_already_responded(pool: PgPool) {
    let visit_id = seed_visit(&pool).await;

    let first = post_signed(
        common::build_test_app(pool.clone()),
        ACTIONS_URI,
        click_payload("waiting", visit_id),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_signed(
        common::build_test_app(pool.clone()),
        ACTIONS_URI,
        click_payload("no_match", visit_id),
    )
    .await;
    assert_eq!(second.status(), StatusCode::OK);
    let json = body_json(second).await;
    assert_eq!(json["text"], "This visit has already been responded to");

    // The first response stands.
    let visit = VisitRepo::find(&pool, visit_id).await.unwrap().unwrap();
    assert_eq!(visit.status(), VisitStatus::Waiting);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_action_id_is_a_bad_request(pool: PgPool) {
    let visit_id = seed_visit(&pool).await;
    let app = common::build_test_app(pool.clone());

    let response = post_signed(app, ACTIONS_URI, click_payload("snooze", visit_id)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let visit = VisitRepo::find(&pool, visit_id).await.unwrap().unwrap();
    assert_eq!(visit.status(), VisitStatus::Pending);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn click_for_unknown_visit_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_signed(app, ACTIONS_URI, click_payload("going_now", 9999)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unrecognized_payload_type_is_ignored(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = form_encode_payload(&json!({ "type": "view_submission" }));
    let response = post_signed(app, ACTIONS_URI, body).await;

    assert_eq!(response.status(), StatusCode::OK);
}
