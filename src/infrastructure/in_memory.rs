//! In-memory repository implementation.
//!
//! Suitable for development and tests. Issues live in a `BTreeMap` keyed by
//! their UUID v7 identifier, so iteration follows creation order.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::RwLock;

use crate::domain::{Issue, IssueFilter, IssueId};
use crate::infrastructure::{IssueRepository, RepositoryError, RepositoryFuture};

/// In-memory implementation of `IssueRepository`.
///
/// # Example
///
/// ```ignore
/// let repository = InMemoryIssueRepository::new();
/// repository.insert(&issue).await?;
/// let found = repository.find_by_id(&issue.issue_id).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryIssueRepository {
    issues: Arc<RwLock<BTreeMap<IssueId, Issue>>>,
}

impl InMemoryIssueRepository {
    /// Creates a new empty in-memory issue repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored issues across all projects.
    pub async fn len(&self) -> usize {
        self.issues.read().await.len()
    }

    /// Returns `true` if no issue is stored.
    pub async fn is_empty(&self) -> bool {
        self.issues.read().await.is_empty()
    }
}

impl IssueRepository for InMemoryIssueRepository {
    fn insert(&self, issue: &Issue) -> RepositoryFuture<()> {
        let issues = Arc::clone(&self.issues);
        let issue = issue.clone();
        async move {
            let mut guard = issues.write().await;
            if guard.contains_key(&issue.issue_id) {
                return Err(RepositoryError::DuplicateId(issue.issue_id.to_string()));
            }
            guard.insert(issue.issue_id, issue);
            Ok(())
        }
        .boxed()
    }

    fn find_by_id(&self, id: &IssueId) -> RepositoryFuture<Option<Issue>> {
        let issues = Arc::clone(&self.issues);
        let id = *id;
        async move { Ok(issues.read().await.get(&id).cloned()) }.boxed()
    }

    fn find(&self, filter: &IssueFilter) -> RepositoryFuture<Vec<Issue>> {
        let issues = Arc::clone(&self.issues);
        let filter = filter.clone();
        async move {
            let guard = issues.read().await;
            Ok(guard
                .values()
                .filter(|issue| filter.matches(issue))
                .cloned()
                .collect())
        }
        .boxed()
    }

    fn save(&self, issue: &Issue) -> RepositoryFuture<()> {
        let issues = Arc::clone(&self.issues);
        let issue = issue.clone();
        async move {
            let mut guard = issues.write().await;
            match guard.get_mut(&issue.issue_id) {
                Some(stored) => {
                    *stored = issue;
                    Ok(())
                }
                None => Err(RepositoryError::NotFound(issue.issue_id.to_string())),
            }
        }
        .boxed()
    }

    fn delete(&self, id: &IssueId) -> RepositoryFuture<bool> {
        let issues = Arc::clone(&self.issues);
        let id = *id;
        async move { Ok(issues.write().await.remove(&id).is_some()) }.boxed()
    }
}

// =============================================================================
// Tests
// =============================================================================
