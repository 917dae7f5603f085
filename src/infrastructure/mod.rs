//! Infrastructure module for issue storage.
//!
//! This module contains the repository trait, its in-memory and `PostgreSQL`
//! implementations, and the factory selecting one at startup.

pub mod factory;
pub mod in_memory;
pub mod postgres;
pub mod repository;

pub use factory::{
    ConfigurationError, FactoryError, RepositoryConfig, RepositoryFactory, StorageMode,
};
pub use in_memory::InMemoryIssueRepository;
pub use postgres::PostgresIssueRepository;
pub use repository::{IssueRepository, RepositoryError, RepositoryFuture};
