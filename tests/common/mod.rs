//! Common test helpers for integration tests.
//!
//! Each helper drives the real router in-process with
//! `tower::ServiceExt::oneshot`; no socket is opened.
//!
//! # Note
//!
//! `#![allow(dead_code)]` is needed because every integration test file is
//! compiled as its own crate and uses only part of this module.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use futures::FutureExt;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use issue_tracker::api::{AppState, create_router};
use issue_tracker::domain::{Issue, IssueFilter, IssueId};
use issue_tracker::infrastructure::{
    InMemoryIssueRepository, IssueRepository, RepositoryError, RepositoryFuture,
};

pub const PROJECT: &str = "apitest";

// =============================================================================
// App Creation Helpers
// =============================================================================

/// Creates a router over a fresh in-memory repository.
pub fn create_test_app() -> Router {
    create_router(AppState::new(InMemoryIssueRepository::new()))
}

/// Creates a router whose repository fails every call.
pub fn create_failing_app() -> Router {
    create_router(AppState::new(FailingIssueRepository))
}

/// Creates a router whose reads succeed against `repository` but whose
/// `save` reports the issue as gone.
pub fn create_vanishing_app(repository: InMemoryIssueRepository) -> Router {
    create_router(AppState::new(VanishingIssueRepository { repository }))
}

// =============================================================================
// Repository Stubs
// =============================================================================

/// Repository that fails every operation with a database error.
#[derive(Debug, Clone, Copy)]
pub struct FailingIssueRepository;

fn unavailable<T: Send + 'static>() -> RepositoryFuture<T> {
    async { Err(RepositoryError::DatabaseError("connection refused".to_string())) }.boxed()
}

impl IssueRepository for FailingIssueRepository {
    fn insert(&self, _issue: &Issue) -> RepositoryFuture<()> {
        unavailable()
    }

    fn find_by_id(&self, _id: &IssueId) -> RepositoryFuture<Option<Issue>> {
        unavailable()
    }

    fn find(&self, _filter: &IssueFilter) -> RepositoryFuture<Vec<Issue>> {
        unavailable()
    }

    fn save(&self, _issue: &Issue) -> RepositoryFuture<()> {
        unavailable()
    }

    fn delete(&self, _id: &IssueId) -> RepositoryFuture<bool> {
        unavailable()
    }
}

/// Simulates an issue deleted between the load and the save of an update.
#[derive(Debug, Clone)]
pub struct VanishingIssueRepository {
    repository: InMemoryIssueRepository,
}

impl IssueRepository for VanishingIssueRepository {
    fn insert(&self, issue: &Issue) -> RepositoryFuture<()> {
        self.repository.insert(issue)
    }

    fn find_by_id(&self, id: &IssueId) -> RepositoryFuture<Option<Issue>> {
        self.repository.find_by_id(id)
    }

    fn find(&self, filter: &IssueFilter) -> RepositoryFuture<Vec<Issue>> {
        self.repository.find(filter)
    }

    fn save(&self, issue: &Issue) -> RepositoryFuture<()> {
        let id = issue.issue_id.to_string();
        async move { Err(RepositoryError::NotFound(id)) }.boxed()
    }

    fn delete(&self, id: &IssueId) -> RepositoryFuture<bool> {
        self.repository.delete(id)
    }
}

// =============================================================================
// Request Helpers
// =============================================================================

/// Response status and collected body.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("response body should be JSON")
    }
}

pub fn issues_uri(project: &str) -> String {
    format!("/api/issues/{project}")
}

/// Sends `request` through `app` and collects the response.
pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();

    TestResponse {
        status,
        body: String::from_utf8(bytes.to_vec()).expect("body should be UTF-8"),
    }
}

/// Sends a JSON body with `method` to `uri`.
pub async fn send_json(app: &Router, method: Method, uri: &str, body: &Value) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build");
    send(app, request).await
}

/// Sends a form-encoded body with `method` to `uri`.
pub async fn send_form(app: &Router, method: Method, uri: &str, body: &str) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("request should build");
    send(app, request).await
}

/// Lists issues of `project`; `query` is appended verbatim when non-empty.
pub async fn list(app: &Router, project: &str, query: &str) -> TestResponse {
    let uri = if query.is_empty() {
        issues_uri(project)
    } else {
        format!("{}?{query}", issues_uri(project))
    };
    let request = Request::get(uri)
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn full_issue_body() -> Value {
    json!({
        "issue_title": "Fix error in posting data",
        "issue_text": "When we post data it has an error.",
        "created_by": "Joe",
        "assigned_to": "Joe",
        "status_text": "In QA"
    })
}

pub fn required_issue_body(title: &str, created_by: &str) -> Value {
    json!({
        "issue_title": title,
        "issue_text": "Reported from the test suite.",
        "created_by": created_by
    })
}

/// Creates an issue in `project` and returns the response JSON.
pub async fn create_issue(app: &Router, project: &str, body: &Value) -> Value {
    let response = send_json(app, Method::POST, &issues_uri(project), body).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.json()
}

/// Returns the `_id` of a created issue.
pub fn issue_id(issue: &Value) -> String {
    issue["_id"]
        .as_str()
        .expect("issue should have an _id")
        .to_string()
}
