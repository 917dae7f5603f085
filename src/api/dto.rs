//! Data Transfer Objects for API requests and responses.
//!
//! Request DTOs accept every field as optional so that a missing field is
//! reported by the handler with the documented message rather than by the
//! deserializer. They are converted into domain types at the boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::domain::{Issue, IssueChanges, IssueFilter, NewIssue, Timestamp};

/// Drops empty strings: an empty value counts as "not supplied".
fn supplied(value: Option<&String>) -> Option<String> {
    value.filter(|value| !value.is_empty()).cloned()
}

// =============================================================================
// List Query
// =============================================================================

/// Query string of `GET /api/issues/{project}`.
///
/// Unlike request bodies, an empty query value is a real constraint:
/// `assigned_to=` lists issues assigned to nobody.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListIssuesQuery {
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    pub created_on: Option<DateTime<Utc>>,
    pub updated_on: Option<DateTime<Utc>>,
    pub open: Option<bool>,
}

impl ListIssuesQuery {
    /// Converts the query into a filter scoped to `project`.
    #[must_use]
    pub fn into_filter(self, project: impl Into<String>) -> IssueFilter {
        IssueFilter {
            project: project.into(),
            issue_title: self.issue_title,
            issue_text: self.issue_text,
            created_by: self.created_by,
            assigned_to: self.assigned_to,
            status_text: self.status_text,
            created_on: self.created_on.map(Timestamp::from_datetime),
            updated_on: self.updated_on.map(Timestamp::from_datetime),
            open: self.open,
        }
    }
}

// =============================================================================
// Create Request
// =============================================================================

/// Body of `POST /api/issues/{project}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateIssueRequest {
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
}

impl CreateIssueRequest {
    /// Checks the required fields and fills in defaults.
    ///
    /// # Errors
    ///
    /// Returns the fixed required-fields error if `issue_title`, `issue_text`
    /// or `created_by` is missing or empty. The message does not say which.
    pub fn validate(&self) -> Result<NewIssue, ApiError> {
        let (Some(issue_title), Some(issue_text), Some(created_by)) = (
            supplied(self.issue_title.as_ref()),
            supplied(self.issue_text.as_ref()),
            supplied(self.created_by.as_ref()),
        ) else {
            return Err(ApiError::required_fields());
        };

        Ok(NewIssue {
            issue_title,
            issue_text,
            created_by,
            assigned_to: self.assigned_to.clone().unwrap_or_default(),
            status_text: self.status_text.clone().unwrap_or_default(),
        })
    }
}

// =============================================================================
// Update Request
// =============================================================================

/// Body of `PUT /api/issues/{project}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateIssueRequest {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    pub open: Option<bool>,
}

impl UpdateIssueRequest {
    /// Returns the identifier as sent, or `""` if absent.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    /// Returns the changes this request applies.
    ///
    /// Falsy values are treated as not supplied: empty strings are dropped
    /// and `open` only counts when it is `true`. As a consequence this
    /// endpoint can neither clear a text field nor close an issue.
    #[must_use]
    pub fn changes(&self) -> IssueChanges {
        IssueChanges {
            issue_title: supplied(self.issue_title.as_ref()),
            issue_text: supplied(self.issue_text.as_ref()),
            created_by: supplied(self.created_by.as_ref()),
            assigned_to: supplied(self.assigned_to.as_ref()),
            status_text: supplied(self.status_text.as_ref()),
            open: self.open.filter(|open| *open),
        }
    }
}

// =============================================================================
// Delete Request
// =============================================================================

/// Body of `DELETE /api/issues/{project}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteIssueRequest {
    #[serde(rename = "_id")]
    pub id: Option<String>,
}

impl DeleteIssueRequest {
    /// Returns the identifier as sent, or `None` if absent or empty.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

// =============================================================================
// Issue Response
// =============================================================================

/// An issue as returned to clients. The project is never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    pub assigned_to: String,
    pub status_text: String,
    pub created_on: DateTime<Utc>,
    pub updated_on: Option<DateTime<Utc>>,
    pub open: bool,
}

impl From<&Issue> for IssueResponse {
    fn from(issue: &Issue) -> Self {
        Self {
            id: issue.issue_id.to_string(),
            issue_title: issue.issue_title.clone(),
            issue_text: issue.issue_text.clone(),
            created_by: issue.created_by.clone(),
            assigned_to: issue.assigned_to.clone(),
            status_text: issue.status_text.clone(),
            created_on: *issue.created_on.as_datetime(),
            updated_on: issue.updated_on.map(|updated_on| *updated_on.as_datetime()),
            open: issue.open,
        }
    }
}

impl From<Issue> for IssueResponse {
    fn from(issue: Issue) -> Self {
        Self::from(&issue)
    }
}

// =============================================================================
// Tests
// =============================================================================
