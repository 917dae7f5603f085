//! Domain module for issue tracking.
//!
//! This module contains the issue entity, its value objects and the filter
//! used to query issues of a project.

pub mod filter;
pub mod issue;

pub use filter::IssueFilter;
pub use issue::{Issue, IssueChanges, IssueId, NewIssue, Timestamp};
