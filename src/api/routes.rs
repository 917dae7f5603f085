//! Routing definitions for the issue tracker API.

use axum::Router;
use axum::body::Body;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, create_issue, delete_issue, health_check, list_issues, update_issue,
};
use crate::middleware::{RequestIdLayer, make_request_span};

/// Creates the application router with all routes and middleware.
///
/// # Examples
///
/// ```ignore
/// let state = AppState::new(InMemoryIssueRepository::new());
/// let router = create_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
/// axum::serve(listener, router).await?;
/// ```
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/issues/{project}",
            get(list_issues)
                .post(create_issue)
                .put(update_issue)
                .delete(delete_issue),
        )
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
        .layer(RequestIdLayer::new())
        .layer(create_cors_layer())
        .with_state(state)
}

/// Allows any origin, method and header.
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryIssueRepository;
    use crate::middleware::REQUEST_ID_HEADER;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use rstest::rstest;
    use tower::ServiceExt;

    fn create_test_app() -> Router {
        create_router(AppState::new(InMemoryIssueRepository::new()))
    }

    #[rstest]
    #[tokio::test]
    async fn health_check_returns_json() {
        let response = create_test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[rstest]
    #[tokio::test]
    async fn adds_request_id_header() {
        let response = create_test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.headers().contains_key(&REQUEST_ID_HEADER));
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_route_returns_404() {
        let response = create_test_app()
            .oneshot(Request::get("/api/issues").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[tokio::test]
    async fn unsupported_method_returns_405() {
        let response = create_test_app()
            .oneshot(
                Request::patch("/api/issues/apitest")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
