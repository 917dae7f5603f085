//! API module for HTTP handlers.
//!
//! This module contains route definitions, request/response types and the
//! handlers for the `/api/issues/{project}` resource.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod payload;
pub mod routes;

pub use dto::{
    CreateIssueRequest, DeleteIssueRequest, IssueResponse, ListIssuesQuery, UpdateIssueRequest,
};
pub use error::ApiError;
pub use handlers::{
    AppState, HealthResponse, create_issue, delete_issue, health_check, list_issues, update_issue,
};
pub use payload::Payload;
pub use routes::create_router;
