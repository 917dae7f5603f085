//! HTTP middleware components.
//!
//! - [`request_id`]: request id propagation and the per-request tracing span

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdLayer, make_request_span};
