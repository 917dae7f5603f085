//! # issue-tracker
//!
//! A REST service that tracks issues per project.
//!
//! Issues live under `/api/issues/{project}` and support listing with
//! filters, creation, partial update and deletion. Storage is either
//! in-process or `PostgreSQL` JSONB documents, selected at startup.
//!
//! ## Modules
//!
//! - [`domain`]: the issue model and list filters
//! - [`infrastructure`]: the repository trait, its backends and the factory
//! - [`api`]: request/response types, handlers and the router
//! - [`middleware`]: request id propagation
//! - [`server`]: bind address configuration and graceful shutdown

pub mod api;
pub mod domain;
pub mod infrastructure;
pub mod middleware;
pub mod server;
