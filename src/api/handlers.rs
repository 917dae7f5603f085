//! HTTP handlers for the issue tracker API.
//!
//! All issue routes live under `/api/issues/{project}`. Update and delete
//! address an issue by `_id` alone; the project in the path only scopes
//! listing and creation.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use super::dto::{
    CreateIssueRequest, DeleteIssueRequest, IssueResponse, ListIssuesQuery, UpdateIssueRequest,
};
use super::error::ApiError;
use super::payload::Payload;
use crate::domain::{Issue, IssueId, Timestamp};
use crate::infrastructure::{IssueRepository, RepositoryError};

// =============================================================================
// Application State
// =============================================================================

/// Shared application dependencies.
///
/// The repository is a trait object so the backend chosen by
/// `RepositoryFactory` at startup can be swapped for a stub in tests.
#[derive(Clone)]
pub struct AppState {
    pub issue_repository: Arc<dyn IssueRepository + Send + Sync>,
}

impl AppState {
    #[must_use]
    pub fn new(repository: impl IssueRepository + 'static) -> Self {
        Self {
            issue_repository: Arc::new(repository),
        }
    }

    /// Creates a new `AppState` from the repository returned by
    /// `RepositoryFactory::create()`.
    #[must_use]
    pub fn from_repository(issue_repository: Arc<dyn IssueRepository + Send + Sync>) -> Self {
        Self { issue_repository }
    }
}

// =============================================================================
// GET /api/issues/{project}
// =============================================================================

/// Lists the issues of a project matching every supplied filter.
///
/// # Response
///
/// - **200 OK**: JSON array in creation order, possibly empty
/// - **400 Bad Request**: A filter value could not be parsed
/// - **500 Internal Server Error**: `Something went wrong...`
///
/// # Errors
///
/// Returns [`ApiError::generic`] if the repository fails.
pub async fn list_issues(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Query(query): Query<ListIssuesQuery>,
) -> Result<Json<Vec<IssueResponse>>, ApiError> {
    let filter = query.into_filter(project);

    let issues = state
        .issue_repository
        .find(&filter)
        .await
        .map_err(|error| {
            tracing::error!(%error, project = %filter.project, "failed to list issues");
            ApiError::generic()
        })?;

    tracing::debug!(project = %filter.project, count = issues.len(), "listed issues");
    Ok(Json(issues.iter().map(IssueResponse::from).collect()))
}

// =============================================================================
// POST /api/issues/{project}
// =============================================================================

/// Creates an open issue in the project.
///
/// # Request Body
///
/// ```json
/// {
///   "issue_title": "Fix error in posting data",
///   "issue_text": "When we post data it has an error.",
///   "created_by": "Joe",
///   "assigned_to": "Joe",
///   "status_text": "In QA"
/// }
/// ```
///
/// `assigned_to` and `status_text` are optional and default to `""`.
///
/// # Response
///
/// - **201 Created**: The stored issue
/// - **400 Bad Request**: A required field is missing or empty
/// - **500 Internal Server Error**: `Something went wrong...`
///
/// # Errors
///
/// Returns [`ApiError`] for the 400 and 500 cases above.
pub async fn create_issue(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Payload(request): Payload<CreateIssueRequest>,
) -> Result<(StatusCode, Json<IssueResponse>), ApiError> {
    let new_issue = request.validate()?;
    let issue = Issue::new(IssueId::generate(), project, new_issue, Timestamp::now());

    state.issue_repository.insert(&issue).await.map_err(|error| {
        tracing::error!(%error, issue_id = %issue.issue_id, "failed to create issue");
        ApiError::generic()
    })?;

    tracing::info!(issue_id = %issue.issue_id, project = %issue.project, "issue created");
    Ok((StatusCode::CREATED, Json(IssueResponse::from(&issue))))
}

// =============================================================================
// PUT /api/issues/{project}
// =============================================================================

/// Applies a partial update to the issue identified by `_id`.
///
/// Empty strings and `open: false` count as not supplied, so an update can
/// neither clear a field nor close an issue. A missing `_id` names no issue
/// and is answered like any unknown one.
///
/// # Response
///
/// - **200 OK**: `successfully updated {_id}`
/// - **400 Bad Request**: `no updated field sent`
/// - **404 Not Found**: `could not update {_id}`
/// - **500 Internal Server Error**: `could not update {_id}`
///
/// # Errors
///
/// Returns [`ApiError`] for the failure cases above.
pub async fn update_issue(
    State(state): State<AppState>,
    Payload(request): Payload<UpdateIssueRequest>,
) -> Result<String, ApiError> {
    let changes = request.changes();
    if changes.is_empty() {
        return Err(ApiError::no_updated_field());
    }
    let raw_id = request.id();
    let issue_id = IssueId::parse(raw_id).ok_or_else(|| ApiError::update_not_found(raw_id))?;

    let issue = state
        .issue_repository
        .find_by_id(&issue_id)
        .await
        .map_err(|error| {
            tracing::error!(%error, %issue_id, "failed to load issue for update");
            ApiError::update_failed(raw_id)
        })?
        .ok_or_else(|| ApiError::update_not_found(raw_id))?;

    let updated = issue.apply(changes, Timestamp::now());

    state
        .issue_repository
        .save(&updated)
        .await
        .map_err(|error| match error {
            RepositoryError::NotFound(_) => ApiError::update_not_found(raw_id),
            error => {
                tracing::error!(%error, %issue_id, "failed to save issue");
                ApiError::update_failed(raw_id)
            }
        })?;

    tracing::info!(%issue_id, "issue updated");
    Ok(format!("successfully updated {raw_id}"))
}

// =============================================================================
// DELETE /api/issues/{project}
// =============================================================================

/// Deletes the issue identified by `_id`.
///
/// Deleting an issue that does not exist succeeds.
///
/// # Response
///
/// - **200 OK**: `deleted {_id}`
/// - **400 Bad Request**: `_id error`
/// - **500 Internal Server Error**: `could not delete {_id}`
///
/// # Errors
///
/// Returns [`ApiError`] for the failure cases above.
pub async fn delete_issue(
    State(state): State<AppState>,
    Payload(request): Payload<DeleteIssueRequest>,
) -> Result<String, ApiError> {
    let raw_id = request.id().ok_or_else(ApiError::missing_id)?;

    // A non-UUID id cannot name a stored issue, so there is nothing to remove.
    if let Some(issue_id) = IssueId::parse(raw_id) {
        let removed = state
            .issue_repository
            .delete(&issue_id)
            .await
            .map_err(|error| {
                tracing::error!(%error, %issue_id, "failed to delete issue");
                ApiError::delete_failed(raw_id)
            })?;
        tracing::info!(%issue_id, removed, "issue deleted");
    }

    Ok(format!("deleted {raw_id}"))
}

// =============================================================================
// GET /health
// =============================================================================

/// Health check response body.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Reports that the service is running.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}
