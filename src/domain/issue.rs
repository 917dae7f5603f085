//! Issue domain model.
//!
//! An [`Issue`] is the only entity tracked by the service. Issues are grouped
//! by a free-form project name and identified by a time-ordered UUID.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Value Objects - Newtypes
// =============================================================================

/// Unique identifier for an issue.
///
/// Generated with UUID v7 so that identifiers sort in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IssueId(Uuid);

impl IssueId {
    /// Returns the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Generates a new time-ordered `IssueId` (UUID v7).
    ///
    /// **Note**: This is an impure function (side effect: time + random).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parses an identifier supplied by a client.
    ///
    /// Returns `None` for anything that is not a UUID. Such identifiers can
    /// never match a stored issue.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value.trim()).ok().map(Self)
    }
}

impl std::fmt::Display for IssueId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A timestamp wrapper for `DateTime<Utc>`.
///
/// Serializes as an RFC 3339 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a `Timestamp` from a `DateTime<Utc>`.
    #[must_use]
    pub const fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }

    /// Returns the inner `DateTime<Utc>`.
    #[must_use]
    pub const fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the current time as a `Timestamp`.
    ///
    /// **Note**: This is an impure function (side effect: system clock).
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0.to_rfc3339())
    }
}

// =============================================================================
// NewIssue
// =============================================================================

/// Validated input for creating an issue.
///
/// The three required fields are guaranteed non-empty by the API boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    pub assigned_to: String,
    pub status_text: String,
}

// =============================================================================
// IssueChanges
// =============================================================================

/// A partial update to an issue.
///
/// Every `Some` field replaces the stored value. There is no way to express
/// "set to empty": the API boundary drops empty strings and `open = false`
/// before building this value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueChanges {
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    pub open: Option<bool>,
}

impl IssueChanges {
    /// Returns `true` when no field would be changed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.issue_title.is_none()
            && self.issue_text.is_none()
            && self.created_by.is_none()
            && self.assigned_to.is_none()
            && self.status_text.is_none()
            && self.open.is_none()
    }
}

// =============================================================================
// Issue
// =============================================================================

/// A tracked issue.
///
/// The serialized form is the stored document. `project` is part of the
/// document but is stripped from every API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Unique identifier, assigned at creation.
    #[serde(rename = "_id")]
    pub issue_id: IssueId,
    /// Project the issue belongs to.
    pub project: String,
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    pub assigned_to: String,
    pub status_text: String,
    /// Creation time, immutable.
    pub created_on: Timestamp,
    /// Time of the last successful update, `None` until the first one.
    pub updated_on: Option<Timestamp>,
    /// Whether the issue is open. Always `true` at creation.
    pub open: bool,
}

impl Issue {
    /// Creates a new open issue that has never been updated.
    ///
    /// This is a pure function. Use `IssueId::generate()` and
    /// `Timestamp::now()` at the call site.
    #[must_use]
    pub fn new(
        issue_id: IssueId,
        project: impl Into<String>,
        new_issue: NewIssue,
        created_on: Timestamp,
    ) -> Self {
        Self {
            issue_id,
            project: project.into(),
            issue_title: new_issue.issue_title,
            issue_text: new_issue.issue_text,
            created_by: new_issue.created_by,
            assigned_to: new_issue.assigned_to,
            status_text: new_issue.status_text,
            created_on,
            updated_on: None,
            open: true,
        }
    }

    /// Returns the issue with `changes` applied and `updated_on` set to `now`.
    ///
    /// `updated_on` never moves before `created_on`, even if the clock does.
    #[must_use]
    pub fn apply(self, changes: IssueChanges, now: Timestamp) -> Self {
        let updated_on = now.max(self.created_on);
        Self {
            issue_title: changes.issue_title.unwrap_or(self.issue_title),
            issue_text: changes.issue_text.unwrap_or(self.issue_text),
            created_by: changes.created_by.unwrap_or(self.created_by),
            assigned_to: changes.assigned_to.unwrap_or(self.assigned_to),
            status_text: changes.status_text.unwrap_or(self.status_text),
            open: changes.open.unwrap_or(self.open),
            updated_on: Some(updated_on),
            ..self
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
