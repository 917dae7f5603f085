//! Request body extractor accepting JSON and HTML form submissions.

use axum::Form;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header;
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// Kind of body a request declares through its `Content-Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
}

/// Classifies a `Content-Type` value, ignoring parameters and case.
fn body_kind(content_type: &str) -> Option<BodyKind> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if essence == "application/json" || essence.ends_with("+json") {
        Some(BodyKind::Json)
    } else if essence == "application/x-www-form-urlencoded" {
        Some(BodyKind::Form)
    } else {
        None
    }
}

/// Request body decoded from `application/json` or
/// `application/x-www-form-urlencoded`.
///
/// Bodies of any other or no `Content-Type` are not read and yield
/// `T::default()`, as does an empty JSON body. A body that fails to decode
/// is rejected with `400 Bad Request`.
#[derive(Debug, Clone, Default)]
pub struct Payload<T>(pub T);

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let kind = request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(body_kind);

        match kind {
            Some(BodyKind::Json) => {
                let bytes = Bytes::from_request(request, state)
                    .await
                    .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
                if bytes.is_empty() {
                    return Ok(Self(T::default()));
                }
                Json::<T>::from_bytes(&bytes)
                    .map(|Json(value)| Self(value))
                    .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
            }
            Some(BodyKind::Form) => Form::<T>::from_request(request, state)
                .await
                .map(|Form(value)| Self(value))
                .map_err(|rejection| ApiError::bad_request(rejection.body_text())),
            None => Ok(Self(T::default())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, StatusCode};
    use rstest::rstest;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq, Eq)]
    struct Sample {
        name: Option<String>,
        open: Option<bool>,
    }

    fn request(content_type: Option<&str>, body: &str) -> Request {
        let mut builder = Request::builder().method(Method::PUT).uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn extract(request: Request) -> Result<Sample, ApiError> {
        Payload::<Sample>::from_request(request, &())
            .await
            .map(|Payload(sample)| sample)
    }

    #[rstest]
    #[case("application/json", Some(BodyKind::Json))]
    #[case("Application/JSON; charset=utf-8", Some(BodyKind::Json))]
    #[case("application/merge-patch+json", Some(BodyKind::Json))]
    #[case("application/x-www-form-urlencoded", Some(BodyKind::Form))]
    #[case("text/plain", None)]
    fn test_body_kind(#[case] content_type: &str, #[case] expected: Option<BodyKind>) {
        assert_eq!(body_kind(content_type), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn test_json_body() {
        let sample = extract(request(Some("application/json"), r#"{"name":"a","open":true}"#))
            .await
            .unwrap();

        assert_eq!(sample.name.as_deref(), Some("a"));
        assert_eq!(sample.open, Some(true));
    }

    #[rstest]
    #[tokio::test]
    async fn test_form_body() {
        let sample = extract(request(
            Some("application/x-www-form-urlencoded"),
            "name=a+b&open=true",
        ))
        .await
        .unwrap();

        assert_eq!(sample.name.as_deref(), Some("a b"));
        assert_eq!(sample.open, Some(true));
    }

    #[rstest]
    #[case(None, "ignored")]
    #[case(Some("application/json"), "")]
    #[case(Some("text/plain"), "name=a")]
    #[case(Some("multipart/form-data; boundary=x"), "--x--")]
    #[tokio::test]
    async fn test_missing_body_is_default(#[case] content_type: Option<&str>, #[case] body: &str) {
        let sample = extract(request(content_type, body)).await.unwrap();
        assert_eq!(sample, Sample::default());
    }

    #[rstest]
    #[case(Some("application/json"), "{not json")]
    #[case(Some("application/json"), "[1, 2]")]
    #[tokio::test]
    async fn test_rejects_undecodable_body(#[case] content_type: Option<&str>, #[case] body: &str) {
        let error = extract(request(content_type, body)).await.unwrap_err();
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }
}
