//! Storage faults surface as 500 responses with fixed texts.

mod common;

use axum::http::{Method, StatusCode};
use rstest::rstest;
use serde_json::json;

use common::{
    PROJECT, create_failing_app, create_issue, create_vanishing_app, full_issue_body, issue_id,
    issues_uri, list, send_json,
};
use issue_tracker::infrastructure::InMemoryIssueRepository;

const SOME_ID: &str = "0190a0e0-0000-7000-8000-000000000000";

#[rstest]
#[tokio::test]
async fn list_failure_is_generic() {
    let app = create_failing_app();

    let response = list(&app, PROJECT, "open=true").await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, "Something went wrong...");
}

#[rstest]
#[tokio::test]
async fn create_failure_is_generic() {
    let app = create_failing_app();

    let response = send_json(&app, Method::POST, &issues_uri(PROJECT), &full_issue_body()).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, "Something went wrong...");
}

#[rstest]
#[tokio::test]
async fn create_validation_runs_before_storage() {
    let app = create_failing_app();

    let response = send_json(&app, Method::POST, &issues_uri(PROJECT), &json!({})).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test]
async fn update_failure_names_the_id() {
    let app = create_failing_app();

    let response = send_json(
        &app,
        Method::PUT,
        &issues_uri(PROJECT),
        &json!({ "_id": SOME_ID, "status_text": "Done" }),
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, format!("could not update {SOME_ID}"));
}

#[rstest]
#[tokio::test]
async fn delete_failure_names_the_id() {
    let app = create_failing_app();

    let response = send_json(
        &app,
        Method::DELETE,
        &issues_uri(PROJECT),
        &json!({ "_id": SOME_ID }),
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, format!("could not delete {SOME_ID}"));
}

#[rstest]
#[tokio::test]
async fn update_of_issue_deleted_meanwhile_is_not_found() {
    let repository = InMemoryIssueRepository::new();
    let app = create_vanishing_app(repository);
    let id = issue_id(&create_issue(&app, PROJECT, &full_issue_body()).await);

    let response = send_json(
        &app,
        Method::PUT,
        &issues_uri(PROJECT),
        &json!({ "_id": id, "status_text": "Done" }),
    )
    .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, format!("could not update {id}"));
}
