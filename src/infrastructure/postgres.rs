//! `PostgreSQL` repository implementation.
//!
//! Issues are stored as JSONB documents, which keeps the storage model close
//! to a document database: list filters become a single JSONB containment
//! check against the stored document.
//!
//! # Table Schema
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS issues (
//!     id UUID PRIMARY KEY,
//!     project TEXT NOT NULL,
//!     data JSONB NOT NULL,
//!     inserted_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! CREATE INDEX IF NOT EXISTS idx_issues_project ON issues (project);
//! ```

use futures::FutureExt;
use serde_json::{Map, Value};
use sqlx::PgPool;

use crate::domain::{Issue, IssueFilter, IssueId};
use crate::infrastructure::{IssueRepository, RepositoryError, RepositoryFuture};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS issues (
    id UUID PRIMARY KEY,
    project TEXT NOT NULL,
    data JSONB NOT NULL,
    inserted_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

const CREATE_PROJECT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_issues_project ON issues (project)";

fn database_error(error: sqlx::Error) -> RepositoryError {
    RepositoryError::DatabaseError(error.to_string())
}

fn serialization_error(error: serde_json::Error) -> RepositoryError {
    RepositoryError::SerializationError(error.to_string())
}

// =============================================================================
// Filter Document
// =============================================================================

/// Builds the JSONB document a stored issue must contain to match `filter`.
///
/// The project is matched on its own column and is left out of the document.
/// Values are serialized exactly as `Issue` serializes them, so timestamps
/// compare as the same RFC 3339 strings.
///
/// # Errors
///
/// Returns `RepositoryError::SerializationError` if a value cannot be
/// serialized.
pub fn containment_document(filter: &IssueFilter) -> Result<Value, RepositoryError> {
    let mut document = Map::new();

    let text_fields = [
        ("issue_title", &filter.issue_title),
        ("issue_text", &filter.issue_text),
        ("created_by", &filter.created_by),
        ("assigned_to", &filter.assigned_to),
        ("status_text", &filter.status_text),
    ];
    for (key, value) in text_fields {
        if let Some(value) = value {
            document.insert(key.to_string(), Value::String(value.clone()));
        }
    }

    if let Some(created_on) = &filter.created_on {
        document.insert(
            "created_on".to_string(),
            serde_json::to_value(created_on).map_err(serialization_error)?,
        );
    }
    if let Some(updated_on) = &filter.updated_on {
        document.insert(
            "updated_on".to_string(),
            serde_json::to_value(updated_on).map_err(serialization_error)?,
        );
    }
    if let Some(open) = filter.open {
        document.insert("open".to_string(), Value::Bool(open));
    }

    Ok(Value::Object(document))
}

// =============================================================================
// PostgreSQL Issue Repository
// =============================================================================

/// `PostgreSQL` implementation of `IssueRepository`.
///
/// # Example
///
/// ```ignore
/// let pool = PgPool::connect("postgres://localhost/issues").await?;
/// let repository = PostgresIssueRepository::new(pool);
/// repository.ensure_schema().await?;
/// repository.insert(&issue).await?;
/// ```
#[derive(Debug, Clone)]
pub struct PostgresIssueRepository {
    pool: PgPool,
}

impl PostgresIssueRepository {
    /// Creates a new repository over the given connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `issues` table and its index if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DatabaseError` if a statement fails.
    pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;
        sqlx::query(CREATE_PROJECT_INDEX)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;
        Ok(())
    }
}

impl IssueRepository for PostgresIssueRepository {
    fn insert(&self, issue: &Issue) -> RepositoryFuture<()> {
        let pool = self.pool.clone();
        let issue = issue.clone();

        async move {
            let data = serde_json::to_value(&issue).map_err(serialization_error)?;

            let result = sqlx::query(
                "INSERT INTO issues (id, project, data) VALUES ($1, $2, $3) \
                 ON CONFLICT (id) DO NOTHING",
            )
            .bind(issue.issue_id.as_uuid())
            .bind(&issue.project)
            .bind(&data)
            .execute(&pool)
            .await
            .map_err(database_error)?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::DuplicateId(issue.issue_id.to_string()));
            }
            Ok(())
        }
        .boxed()
    }

    fn find_by_id(&self, id: &IssueId) -> RepositoryFuture<Option<Issue>> {
        let pool = self.pool.clone();
        let id = *id;

        async move {
            let row: Option<(Value,)> = sqlx::query_as("SELECT data FROM issues WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&pool)
                .await
                .map_err(database_error)?;

            row.map(|(data,)| serde_json::from_value(data))
                .transpose()
                .map_err(serialization_error)
        }
        .boxed()
    }

    fn find(&self, filter: &IssueFilter) -> RepositoryFuture<Vec<Issue>> {
        let pool = self.pool.clone();
        let filter = filter.clone();

        async move {
            let document = containment_document(&filter)?;

            let rows: Vec<(Value,)> = sqlx::query_as(
                "SELECT data FROM issues WHERE project = $1 AND data @> $2 \
                 ORDER BY inserted_at, id",
            )
            .bind(&filter.project)
            .bind(&document)
            .fetch_all(&pool)
            .await
            .map_err(database_error)?;

            rows.into_iter()
                .map(|(data,)| serde_json::from_value(data).map_err(serialization_error))
                .collect()
        }
        .boxed()
    }

    fn save(&self, issue: &Issue) -> RepositoryFuture<()> {
        let pool = self.pool.clone();
        let issue = issue.clone();

        async move {
            let data = serde_json::to_value(&issue).map_err(serialization_error)?;

            let result = sqlx::query("UPDATE issues SET data = $1 WHERE id = $2")
                .bind(&data)
                .bind(issue.issue_id.as_uuid())
                .execute(&pool)
                .await
                .map_err(database_error)?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::NotFound(issue.issue_id.to_string()));
            }
            Ok(())
        }
        .boxed()
    }

    fn delete(&self, id: &IssueId) -> RepositoryFuture<bool> {
        let pool = self.pool.clone();
        let id = *id;

        async move {
            let result = sqlx::query("DELETE FROM issues WHERE id = $1")
                .bind(id.as_uuid())
                .execute(&pool)
                .await
                .map_err(database_error)?;

            Ok(result.rows_affected() > 0)
        }
        .boxed()
    }
}

// =============================================================================
// Tests
// =============================================================================
