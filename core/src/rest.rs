// crudsvc
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Generic code for REST handlers.
//!
//! All services should implement an `app` function in this module that returns the `Router` for the
//! application.
//!
//! Every API should be put in its own `.rs` file, using a name like `<entity>_<method>.rs`.  This
//! may seem overkill, but putting every API in its own file makes it easy to ensure all the
//! integration tests for the given API truly belong to that API.
//!
//! More specifically, the `tests` module within an API should define a `route` method that
//! returns the HTTP method and the API path under test.  All integration tests within the module
//! then rely on `route` to obtain this information, ensuring that they all test the desired API.
//!
//! It is also useful for the tests in this layer to define a `TestContext` in a `testutils` module
//! that allows interacting with the database layer directly, using simplified types.

use crate::driver::DriverError;
use crate::model::ModelError;
use async_trait::async_trait;
use axum::Json;
use axum::body::{Bytes, HttpBody};
use axum::extract::{FromRequest, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use log::{error, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Message returned to the client in place of the details of an internal error.
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Frontend errors.  These are the errors that are visible to the user on failed requests.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum RestError {
    /// Catch-all error type for all unexpected errors.
    #[error("{0}")]
    InternalError(String),

    /// Indicates an error in the contents of the request.
    #[error("{0}")]
    InvalidRequest(String),

    /// Indicates that a requested entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Indicates that a request that should have empty content did not.
    #[error("Content should be empty")]
    PayloadNotEmpty,

    /// Indicates that the content of a request exceeds the configured limits.
    #[error("{0}")]
    PayloadTooLarge(String),
}

impl From<DriverError> for RestError {
    fn from(e: DriverError) -> Self {
        match e {
            DriverError::AlreadyExists(_) => RestError::InvalidRequest(e.to_string()),
            DriverError::BackendError(_) => RestError::InternalError(e.to_string()),
            DriverError::InvalidInput(_) => RestError::InvalidRequest(e.to_string()),
            DriverError::NotFound(_) => RestError::NotFound(e.to_string()),
        }
    }
}

impl From<ModelError> for RestError {
    fn from(e: ModelError) -> Self {
        RestError::InvalidRequest(e.to_string())
    }
}

impl From<serde_json::Error> for RestError {
    fn from(e: serde_json::Error) -> Self {
        RestError::InvalidRequest(e.to_string())
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = match self {
            RestError::InternalError(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
            RestError::InvalidRequest(_) => http::StatusCode::BAD_REQUEST,
            RestError::NotFound(_) => http::StatusCode::NOT_FOUND,
            RestError::PayloadNotEmpty => http::StatusCode::PAYLOAD_TOO_LARGE,
            RestError::PayloadTooLarge(_) => http::StatusCode::PAYLOAD_TOO_LARGE,
        };

        let message = match self {
            RestError::InternalError(details) => {
                error!("Request failed with internal error: {}", details);
                INTERNAL_ERROR_MESSAGE.to_owned()
            }
            e => e.to_string(),
        };

        let response = ErrorResponse { success: false, message };

        (status, Json(response)).into_response()
    }
}

/// Result type for this module.
pub type RestResult<T> = Result<T, RestError>;

/// Representation of the details of an error response.
#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct ErrorResponse {
    /// Whether the request succeeded.  Always false for errors.
    pub(crate) success: bool,

    /// Textual representation of the error message.
    pub(crate) message: String,
}

/// A request body extractor that forbids any content.
///
/// Any API that doesn't expect a body should use this to ensure we don't get garbage data that we
/// don't care about.  This future-proofs the service.
pub struct EmptyBody {}

#[async_trait]
impl<S> FromRequest<S> for EmptyBody
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        if req.into_body().is_end_stream() {
            Ok(EmptyBody {})
        } else {
            Err(RestError::PayloadNotEmpty)
        }
    }
}

/// A request body extractor that decodes JSON content into a `T`.
///
/// Unlike `axum::Json`, this does not look at the `Content-Type` header of the request and
/// funnels decoding errors through `RestError` so that clients get a structured error body.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = RestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| match e.status() {
            http::StatusCode::PAYLOAD_TOO_LARGE => RestError::PayloadTooLarge(e.body_text()),
            _ => RestError::InvalidRequest(e.body_text()),
        })?;
        let value = serde_json::from_slice::<T>(&bytes)?;
        Ok(JsonBody(value))
    }
}

/// Middleware that logs every request and the status of its response.
///
/// Install with `axum::middleware::from_fn(log_request)`.
pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    info!("Received {} request for {}", method, path);

    let start = Instant::now();
    let response = next.run(req).await;
    info!("{} {} -> {} in {:?}", method, path, response.status().as_u16(), start.elapsed());
    response
}

/// Common test code for the REST server.
#[cfg(feature = "testutils")]
pub mod testutils {
    use super::*;
    use axum::Router;
    use axum::http::{self, HeaderName, HeaderValue};
    use tower::util::ServiceExt;

    /// Maximum body size for testing purposes.
    const MAX_BODY_SIZE: usize = 64 * 1024;

    /// Builder for a single request to the API server.
    #[must_use]
    pub struct OneShotBuilder {
        /// The router for the app being tested.
        app: Router,

        /// Builder for the request that will be sent to the app.
        builder: axum::http::request::Builder,
    }

    impl OneShotBuilder {
        /// Creates a new request against a given `method`/`uri` pair served by an `app` router.
        pub fn new<U: AsRef<str>>(app: Router, (method, uri): (http::Method, U)) -> Self {
            let builder = Request::builder().method(method).uri(uri.as_ref());
            Self { app, builder }
        }

        /// Sets the header `name` to `value` in the outgoing request.
        pub fn with_header<K, V>(mut self, name: K, value: V) -> Self
        where
            HeaderName: TryFrom<K>,
            <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
            HeaderValue: TryFrom<V>,
            <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
        {
            self.builder = self.builder.header(name, value);
            self
        }

        /// Finishes building the request and sends it with an empty payload.
        pub async fn send_empty(self) -> ResponseChecker {
            let request = self.builder.body(axum::body::Body::empty()).unwrap();
            ResponseChecker::from(self.app.oneshot(request).await.unwrap())
        }

        /// Finishes building the request and sends it with a text payload.
        pub async fn send_text<T: Into<String>>(self, text: T) -> ResponseChecker {
            let request = self
                .builder
                .header(http::header::CONTENT_TYPE, mime::TEXT_PLAIN.as_ref())
                .body(axum::body::Body::from(text.into()))
                .unwrap();
            ResponseChecker::from(self.app.oneshot(request).await.unwrap())
        }

        /// Finishes building the request and sends it with a JSON payload.
        pub async fn send_json<T: Serialize>(self, request: T) -> ResponseChecker {
            let request = self
                .builder
                .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(axum::body::Body::from(serde_json::to_vec(&request).unwrap()))
                .unwrap();
            ResponseChecker::from(self.app.oneshot(request).await.unwrap())
        }
    }

    /// Type alias for the complex type returned by the `oneshot` function.
    type HttpResponse = http::Response<axum::body::Body>;

    /// Validator for the outcome of a request sent by a `OneShotBuilder`.
    #[must_use]
    pub struct ResponseChecker {
        /// Actual response that we received from the app.
        response: HttpResponse,

        /// Expected HTTP status code in the response above.
        exp_status: http::StatusCode,
    }

    impl From<HttpResponse> for ResponseChecker {
        fn from(response: HttpResponse) -> Self {
            Self { response, exp_status: http::StatusCode::OK }
        }
    }

    impl ResponseChecker {
        /// Sets the expected exit HTTP status to `status`.
        pub fn expect_status(mut self, status: http::StatusCode) -> Self {
            self.exp_status = status;
            self
        }

        /// Performs common validation operations on the response.
        pub fn verify(&self) {
            assert_eq!(self.exp_status, self.response.status());
        }

        /// Finishes checking the response and expects it to contain an empty body.
        pub async fn expect_empty(self) {
            self.verify();

            let body =
                axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap();
            let body = String::from_utf8(body.to_vec()).unwrap();
            assert!(body.is_empty(), "Body not empty; got {}", body);
        }

        /// Finishes checking the response and expects its body to be an `ErrorResponse` that
        /// matches `exp_re`.
        pub async fn expect_error(self, exp_re: &str) {
            self.verify();

            let body =
                axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap();
            let response: ErrorResponse = match serde_json::from_slice(&body) {
                Ok(response) => response,
                Err(e) => {
                    let body = String::from_utf8(body.to_vec()).unwrap();
                    panic!("Invalid error response due to {}; content was {}", e, body);
                }
            };
            assert!(!response.success, "Error response '{:?}' claims success", response);
            if exp_re.is_empty() {
                assert!(
                    response.message.is_empty(),
                    "Response content '{:?}' is not empty",
                    response
                );
            } else {
                let re = regex::Regex::new(exp_re).unwrap();
                assert!(
                    re.is_match(&response.message),
                    "Response content '{:?}' does not match re '{}'",
                    response,
                    exp_re
                );
            }
        }

        /// Finishes checking the response and expects it to contain a valid JSON object of
        /// type `T`.
        pub async fn expect_json<T: DeserializeOwned>(self) -> T {
            self.verify();

            let body =
                axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap();
            serde_json::from_slice::<T>(&body).unwrap()
        }

        /// Finishes checking the response and expects its body to be valid UTF-8 and to match
        /// `exp_re`.
        pub async fn expect_text(self, exp_re: &str) {
            assert!(!exp_re.is_empty(), "Use expect_empty to validate empty responses");

            self.verify();

            let body =
                axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap();
            let body = String::from_utf8(body.to_vec()).unwrap();
            assert!(
                !body.contains("\"message\":"),
                "Use expect_error to validate errors wrapped in an ErrorResponse"
            );
            let re = regex::Regex::new(exp_re).unwrap();
            assert!(re.is_match(&body), "Body content '{}' does not match re '{}'", body, exp_re);
        }
    }

    /// Generates a test to verify that an API that expects JSON fails when it gets something else.
    #[macro_export]
    macro_rules! test_payload_must_be_json {
        ( $app:expr, $route:expr ) => {
            #[tokio::test]
            async fn test_payload_must_be_json() {
                $crate::rest::testutils::OneShotBuilder::new($app, $route)
                    .send_text("this is not json")
                    .await
                    .expect_status(axum::http::StatusCode::BAD_REQUEST)
                    .expect_error("expected ident")
                    .await;

                $crate::rest::testutils::OneShotBuilder::new($app, $route)
                    .with_header(axum::http::header::CONTENT_TYPE, "application/json")
                    .send_text("this is not json")
                    .await
                    .expect_status(axum::http::StatusCode::BAD_REQUEST)
                    .expect_error("expected ident")
                    .await;
            }
        };
    }

    pub use test_payload_must_be_json;

    /// Generates a test to verify that an API that does not expect a payload fails as necessary.
    #[macro_export]
    macro_rules! test_payload_must_be_empty {
        ( $app:expr, $route:expr ) => {
            #[tokio::test]
            async fn test_payload_must_be_empty() {
                $crate::rest::testutils::OneShotBuilder::new($app, $route)
                    .send_text("should not be here")
                    .await
                    .expect_status(axum::http::StatusCode::PAYLOAD_TOO_LARGE)
                    .expect_error("should be empty")
                    .await;
            }
        };
    }

    pub use test_payload_must_be_empty;
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::extract::DefaultBodyLimit;
    use axum::routing::post;
    use tower::util::ServiceExt;

    async fn into_error_response(response: Response) -> (http::StatusCode, ErrorResponse) {
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[test]
    fn test_rest_error_from_driver_error() {
        assert_eq!(
            RestError::InvalidRequest("dup".to_owned()),
            RestError::from(DriverError::AlreadyExists("dup".to_owned()))
        );
        assert_eq!(
            RestError::InternalError("boom".to_owned()),
            RestError::from(DriverError::BackendError("boom".to_owned()))
        );
        assert_eq!(
            RestError::InvalidRequest("bad".to_owned()),
            RestError::from(DriverError::InvalidInput("bad".to_owned()))
        );
        assert_eq!(
            RestError::NotFound("gone".to_owned()),
            RestError::from(DriverError::NotFound("gone".to_owned()))
        );
    }

    #[tokio::test]
    async fn test_rest_error_into_response_statuses() {
        for (err, exp_status, exp_message) in [
            (
                RestError::InvalidRequest("bad input".to_owned()),
                http::StatusCode::BAD_REQUEST,
                "bad input",
            ),
            (RestError::NotFound("no such".to_owned()), http::StatusCode::NOT_FOUND, "no such"),
            (
                RestError::PayloadNotEmpty,
                http::StatusCode::PAYLOAD_TOO_LARGE,
                "Content should be empty",
            ),
            (
                RestError::PayloadTooLarge("too big".to_owned()),
                http::StatusCode::PAYLOAD_TOO_LARGE,
                "too big",
            ),
        ] {
            let (status, response) = into_error_response(err.into_response()).await;
            assert_eq!(exp_status, status);
            assert!(!response.success);
            assert_eq!(exp_message, response.message);
        }
    }

    #[tokio::test]
    async fn test_rest_error_internal_hides_details() {
        let err = RestError::InternalError("connection refused to 10.0.0.1".to_owned());
        let (status, response) = into_error_response(err.into_response()).await;
        assert_eq!(http::StatusCode::INTERNAL_SERVER_ERROR, status);
        assert!(!response.success);
        assert_eq!(INTERNAL_ERROR_MESSAGE, response.message);
    }

    #[derive(Deserialize)]
    struct Payload {
        value: i32,
    }

    async fn echo_handler(JsonBody(payload): JsonBody<Payload>) -> String {
        payload.value.to_string()
    }

    fn echo_app() -> Router {
        Router::new().route("/echo", post(echo_handler)).layer(axum::middleware::from_fn(log_request))
    }

    async fn send(app: Router, body: &'static str) -> Response {
        let request = Request::builder().method("POST").uri("/echo").body(Body::from(body)).unwrap();
        app.oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_json_body_ignores_content_type() {
        let response = send(echo_app(), "{\"value\": 42}").await;
        assert_eq!(http::StatusCode::OK, response.status());
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(b"42", body.as_ref());
    }

    #[tokio::test]
    async fn test_json_body_invalid() {
        let response = send(echo_app(), "{\"value\": \"text\"}").await;
        let (status, response) = into_error_response(response).await;
        assert_eq!(http::StatusCode::BAD_REQUEST, status);
        assert!(response.message.contains("invalid type"));
    }

    #[tokio::test]
    async fn test_json_body_too_large() {
        let app = echo_app().layer(DefaultBodyLimit::max(8));
        let response = send(app, "{\"value\": 123456789}").await;
        let (status, response) = into_error_response(response).await;
        assert_eq!(http::StatusCode::PAYLOAD_TOO_LARGE, status);
        assert!(!response.success);
        assert!(response.message.contains("length limit exceeded"), "{}", response.message);
    }

    #[tokio::test]
    async fn test_log_request_passes_through_unknown_routes() {
        let request = Request::builder().method("GET").uri("/missing").body(Body::empty()).unwrap();
        let response = echo_app().oneshot(request).await.unwrap();
        assert_eq!(http::StatusCode::NOT_FOUND, response.status());
    }
}
