//! Query filters over issues.
//!
//! An [`IssueFilter`] is always scoped to one project. Every other field is an
//! optional exact-match constraint; `None` leaves the field unconstrained.

use super::issue::{Issue, Timestamp};

/// Exact-match constraints for listing issues of a project.
///
/// Constraints combine with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
    pub project: String,
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    pub created_on: Option<Timestamp>,
    pub updated_on: Option<Timestamp>,
    pub open: Option<bool>,
}

impl IssueFilter {
    /// Creates a filter matching every issue of `project`.
    #[must_use]
    pub fn for_project(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_open(self, open: bool) -> Self {
        Self {
            open: Some(open),
            ..self
        }
    }

    #[must_use]
    pub fn with_created_by(self, created_by: impl Into<String>) -> Self {
        Self {
            created_by: Some(created_by.into()),
            ..self
        }
    }

    #[must_use]
    pub fn with_assigned_to(self, assigned_to: impl Into<String>) -> Self {
        Self {
            assigned_to: Some(assigned_to.into()),
            ..self
        }
    }

    /// Returns `true` if `issue` satisfies every constraint.
    ///
    /// An `updated_on` constraint never matches an issue that was never
    /// updated.
    #[must_use]
    pub fn matches(&self, issue: &Issue) -> bool {
        issue.project == self.project
            && field_matches(self.issue_title.as_ref(), &issue.issue_title)
            && field_matches(self.issue_text.as_ref(), &issue.issue_text)
            && field_matches(self.created_by.as_ref(), &issue.created_by)
            && field_matches(self.assigned_to.as_ref(), &issue.assigned_to)
            && field_matches(self.status_text.as_ref(), &issue.status_text)
            && field_matches(self.created_on.as_ref(), &issue.created_on)
            && self
                .updated_on
                .is_none_or(|expected| issue.updated_on == Some(expected))
            && field_matches(self.open.as_ref(), &issue.open)
    }
}

fn field_matches<T: PartialEq>(expected: Option<&T>, actual: &T) -> bool {
    expected.is_none_or(|expected| expected == actual)
}

// =============================================================================
// Tests
// =============================================================================
