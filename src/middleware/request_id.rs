//! Request correlation ids.
//!
//! Every request carries an `x-request-id`. A non-blank id sent by the client
//! is kept; otherwise a UUID v4 is assigned. The id is stored in the request
//! extensions, recorded on the request's tracing span and echoed on the
//! response so log lines and client reports can be matched up.

use std::task::{Context, Poll};

use axum::http::header::HeaderName;
use axum::http::{HeaderMap, HeaderValue, Request, Response};
use futures::FutureExt;
use futures::future::BoxFuture;
use tower::{Layer, Service};
use tracing::Span;
use uuid::Uuid;

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Correlation identifier of one HTTP request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Takes the client's id from `headers`, or generates one.
    ///
    /// Blank and non-visible-ASCII header values are replaced.
    #[must_use]
    pub fn resolve(headers: &HeaderMap) -> Self {
        headers
            .get(&REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map_or_else(Self::generate, |id| Self(id.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn header_value(&self) -> Option<HeaderValue> {
        HeaderValue::from_str(&self.0).ok()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Builds the `TraceLayer` span of a request, tagged with its [`RequestId`].
///
/// [`RequestIdLayer`] must wrap the trace layer; without it the id is
/// recorded as empty.
pub fn make_request_span<Body>(request: &Request<Body>) -> Span {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(RequestId::as_str)
        .unwrap_or_default();

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

/// Layer installing [`RequestIdService`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdLayer;

impl RequestIdLayer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<Inner> Layer<Inner> for RequestIdLayer {
    type Service = RequestIdService<Inner>;

    fn layer(&self, inner: Inner) -> Self::Service {
        RequestIdService { inner }
    }
}

/// Assigns a [`RequestId`] before the inner service runs and copies it onto
/// the response.
#[derive(Debug, Clone)]
pub struct RequestIdService<Inner> {
    inner: Inner,
}

impl<Inner, RequestBody, ResponseBody> Service<Request<RequestBody>> for RequestIdService<Inner>
where
    Inner: Service<Request<RequestBody>, Response = Response<ResponseBody>>,
    Inner::Future: Send + 'static,
{
    type Response = Response<ResponseBody>;
    type Error = Inner::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, context: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(context)
    }

    fn call(&mut self, mut request: Request<RequestBody>) -> Self::Future {
        let request_id = RequestId::resolve(request.headers());
        let header_value = request_id.header_value();
        request.extensions_mut().insert(request_id);

        self.inner
            .call(request)
            .map(move |result| {
                result.map(|mut response| {
                    if let Some(header_value) = header_value {
                        response
                            .headers_mut()
                            .insert(REQUEST_ID_HEADER.clone(), header_value);
                    }
                    response
                })
            })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use rstest::rstest;
    use std::convert::Infallible;
    use tower::ServiceExt;
    use tower::service_fn;

    async fn echo_extension(request: Request<Body>) -> Result<Response<Body>, Infallible> {
        let seen = request
            .extensions()
            .get::<RequestId>()
            .map(ToString::to_string)
            .unwrap_or_default();
        Ok(Response::new(Body::from(seen)))
    }

    fn headers_with(id: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER.clone(), HeaderValue::from_str(id).unwrap());
        headers
    }

    #[rstest]
    fn generated_ids_are_distinct_uuids() {
        let first = RequestId::generate();
        let second = RequestId::generate();

        assert_ne!(first, second);
        assert!(Uuid::parse_str(first.as_str()).is_ok());
    }

    #[rstest]
    #[case("abc-123", "abc-123")]
    #[case("  padded  ", "padded")]
    fn resolve_keeps_client_id(#[case] sent: &str, #[case] expected: &str) {
        assert_eq!(RequestId::resolve(&headers_with(sent)).as_str(), expected);
    }

    #[rstest]
    #[case(HeaderMap::new())]
    #[case(headers_with("   "))]
    fn resolve_generates_when_missing_or_blank(#[case] headers: HeaderMap) {
        let id = RequestId::resolve(&headers);
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[rstest]
    #[tokio::test]
    async fn service_stores_generated_id_and_echoes_it() {
        let service = RequestIdLayer::new().layer(service_fn(echo_extension));

        let response = service
            .oneshot(Request::new(Body::empty()))
            .await
            .unwrap();

        let header = response.headers()[&REQUEST_ID_HEADER].to_str().unwrap().to_string();
        let body = http_body_util::BodyExt::collect(response.into_body())
            .await
            .unwrap()
            .to_bytes();
        assert!(Uuid::parse_str(&header).is_ok());
        assert_eq!(body, header.as_bytes());
    }

    #[rstest]
    #[tokio::test]
    async fn service_echoes_client_id() {
        let service = RequestIdLayer::new().layer(service_fn(echo_extension));
        let request = Request::builder()
            .header(REQUEST_ID_HEADER.clone(), "client-id")
            .body(Body::empty())
            .unwrap();

        let response = service.oneshot(request).await.unwrap();

        assert_eq!(response.headers()[&REQUEST_ID_HEADER], "client-id");
    }
}
