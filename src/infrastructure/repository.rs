//! Repository trait for issues.
//!
//! Every method returns a boxed future so the repository can be shared as a
//! trait object (`Arc<dyn IssueRepository>`) and selected at runtime.

use futures::future::BoxFuture;
use thiserror::Error;

use crate::domain::{Issue, IssueFilter, IssueId};

// =============================================================================
// Repository Error
// =============================================================================

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Entity was not found.
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// An entity with the same identifier already exists.
    #[error("Duplicate identifier: {0}")]
    DuplicateId(String),

    /// Database connection or query error.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Future returned by every [`IssueRepository`] operation.
pub type RepositoryFuture<T> = BoxFuture<'static, Result<T, RepositoryError>>;

// =============================================================================
// Issue Repository
// =============================================================================

/// Repository trait for issue documents.
///
/// Implementations hold no per-request state. Concurrent writes to the same
/// issue are not coordinated: the last `save` wins.
pub trait IssueRepository: Send + Sync {
    /// Stores a new issue.
    ///
    /// Returns `RepositoryError::DuplicateId` if the identifier is taken.
    fn insert(&self, issue: &Issue) -> RepositoryFuture<()>;

    /// Finds an issue by its identifier.
    ///
    /// Returns `Ok(Some(issue))` if found, `Ok(None)` if not found.
    fn find_by_id(&self, id: &IssueId) -> RepositoryFuture<Option<Issue>>;

    /// Returns every issue matching `filter`, in creation order.
    fn find(&self, filter: &IssueFilter) -> RepositoryFuture<Vec<Issue>>;

    /// Replaces a stored issue.
    ///
    /// Returns `RepositoryError::NotFound` if the issue no longer exists.
    fn save(&self, issue: &Issue) -> RepositoryFuture<()>;

    /// Deletes an issue by its identifier.
    ///
    /// Returns `Ok(true)` if an issue was removed, `Ok(false)` if none existed.
    fn delete(&self, id: &IssueId) -> RepositoryFuture<bool>;
}
