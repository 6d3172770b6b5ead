// III-IV
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
use axum::body::HttpBody;
use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::response::IntoResponse;
use log::error;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Frontend errors.  These are the errors that are visible to the user on failed requests.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum RestError {
    /// Catch-all error type for all unexpected errors.
    #[error("{0}")]
    InternalError(String),

    /// Indicates an error in the contents of the request or a request that cannot be honored
    /// given the current state of the data.
    #[error("{0}")]
    InvalidRequest(String),

    /// Indicates that a requested entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Indicates that a request that should have empty content did not.
    #[error("Content should be empty")]
    PayloadNotEmpty,
}

impl From<DriverError> for RestError {
    fn from(e: DriverError) -> Self {
        match e {
            DriverError::BackendError(_) => RestError::InternalError(e.to_string()),
            DriverError::Conflict(_) => RestError::InvalidRequest(e.to_string()),
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

impl IntoResponse for RestError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            RestError::InternalError(ref message) => {
                error!("Request failed with internal error: {}", message);
                http::StatusCode::INTERNAL_SERVER_ERROR
            }
            RestError::InvalidRequest(_) => http::StatusCode::BAD_REQUEST,
            RestError::NotFound(_) => http::StatusCode::NOT_FOUND,
            RestError::PayloadNotEmpty => http::StatusCode::PAYLOAD_TOO_LARGE,
        };

        let response = ErrorResponse { message: self.to_string() };

        (status, Json(response)).into_response()
    }
}

/// Result type for this module.
pub type RestResult<T> = Result<T, RestError>;

/// Representation of the details of an error response.
#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct ErrorResponse {
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

/// A request body extractor for JSON payloads of type `T`.
///
/// This behaves like `axum::Json` except that any failure to process the payload, including a
/// missing or wrong content type, is reported as an `ErrorResponse` with a 400 status code.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = RestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(RestError::InvalidRequest(rejection.body_text())),
        }
    }
}

/// A path parameters extractor for values of type `T`.
///
/// This behaves like `axum::extract::Path` except that any failure to parse the parameters is
/// reported as an `ErrorResponse` with a 400 status code.
pub struct PathParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for PathParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(PathParams(value)),
            Err(rejection @ PathRejection::FailedToDeserializePathParams(_)) => {
                Err(RestError::InvalidRequest(rejection.body_text()))
            }
            Err(rejection) => Err(RestError::InternalError(rejection.body_text())),
        }
    }
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
            let re = regex::Regex::new(exp_re).unwrap();
            assert!(
                re.is_match(&response.message),
                "Response content '{:?}' does not match re '{}'",
                response,
                exp_re
            );
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
                    .expect_error("Content-Type")
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
    use axum::body::Body;

    /// Payload used to exercise the JSON extractor.
    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        /// Arbitrary value.
        value: i32,
    }

    /// Builds a POST request carrying `body` with an optional `content_type` header.
    fn json_request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(http::header::CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn test_empty_body_ok() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        assert!(EmptyBody::from_request(req, &()).await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_body_not_empty() {
        let req = Request::builder().uri("/").body(Body::from("foo")).unwrap();
        match EmptyBody::from_request(req, &()).await {
            Err(RestError::PayloadNotEmpty) => (),
            _ => panic!("Non-empty body must have been rejected"),
        }
    }

    #[tokio::test]
    async fn test_json_body_ok() {
        let req = json_request(Some("application/json"), r#"{"value": 5}"#);
        let JsonBody(sample) = JsonBody::<Sample>::from_request(req, &()).await.unwrap();
        assert_eq!(Sample { value: 5 }, sample);
    }

    #[tokio::test]
    async fn test_json_body_missing_content_type() {
        let req = json_request(None, r#"{"value": 5}"#);
        match JsonBody::<Sample>::from_request(req, &()).await {
            Err(RestError::InvalidRequest(message)) => assert!(message.contains("Content-Type")),
            _ => panic!("Missing content type must have been rejected"),
        }
    }

    #[tokio::test]
    async fn test_json_body_bad_syntax() {
        let req = json_request(Some("application/json"), "{");
        assert!(matches!(
            JsonBody::<Sample>::from_request(req, &()).await,
            Err(RestError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_json_body_bad_data() {
        let req = json_request(Some("application/json"), r#"{"value": "not a number"}"#);
        assert!(matches!(
            JsonBody::<Sample>::from_request(req, &()).await,
            Err(RestError::InvalidRequest(_))
        ));
    }

    /// Sends a GET request for `uri` to a router that parses an `i32` out of `/items/:id`.
    async fn get_item(uri: &str) -> (http::StatusCode, String) {
        use axum::Router;
        use axum::routing::get;
        use tower::util::ServiceExt;

        async fn handler(PathParams(id): PathParams<i32>) -> String {
            id.to_string()
        }

        let app = Router::new().route("/items/:id", get(handler));
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_path_params_ok() {
        assert_eq!((http::StatusCode::OK, "42".to_owned()), get_item("/items/42").await);
    }

    #[tokio::test]
    async fn test_path_params_invalid() {
        for uri in ["/items/abc", "/items/99999999999"] {
            let (status, body) = get_item(uri).await;
            assert_eq!(http::StatusCode::BAD_REQUEST, status);
            let response: ErrorResponse = serde_json::from_str(&body).unwrap();
            assert!(response.message.contains("Cannot parse"), "Bad message: {}", response.message);
        }
    }

    #[test]
    fn test_rest_error_status_codes() {
        for (err, status) in [
            (RestError::InternalError("x".to_owned()), http::StatusCode::INTERNAL_SERVER_ERROR),
            (RestError::InvalidRequest("x".to_owned()), http::StatusCode::BAD_REQUEST),
            (RestError::NotFound("x".to_owned()), http::StatusCode::NOT_FOUND),
            (RestError::PayloadNotEmpty, http::StatusCode::PAYLOAD_TOO_LARGE),
        ] {
            assert_eq!(status, err.into_response().status());
        }
    }

    #[test]
    fn test_from_driver_error() {
        assert_eq!(
            RestError::InvalidRequest("Trip is full".to_owned()),
            DriverError::Conflict("Trip is full".to_owned()).into()
        );
        assert_eq!(
            RestError::NotFound("Gone".to_owned()),
            DriverError::NotFound("Gone".to_owned()).into()
        );
        assert_eq!(
            RestError::InternalError("Boom".to_owned()),
            DriverError::BackendError("Boom".to_owned()).into()
        );
    }
}
