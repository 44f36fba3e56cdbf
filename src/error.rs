//! Unified error types.
//!
//! Two kinds of failure live here and they never mix:
//!
//! - [`Error`] — infrastructure: binding a port, accepting a connection.
//! - [`HttpError`] — an application-level failure that becomes an HTTP
//!   response (404, 401, 415, …). Handlers return it, middleware raises it,
//!   and the pre-response stage may reshape its payload before it is sent.

use http::{HeaderMap, HeaderValue, StatusCode, header};
use serde_json::{Value, json};

/// The error type returned by the crate's fallible infrastructure operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid socket address `{addr}`: {source}")]
    Addr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// An HTTP error response in the making.
///
/// Carries a status, a short `title` (the canonical reason phrase) and a
/// human-readable `detail`. Until a middleware replaces it with
/// [`set_payload`](HttpError::set_payload), it renders as
/// `{"statusCode":…,"error":…,"message":…}`.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{status}: {detail}")]
pub struct HttpError {
    status: StatusCode,
    detail: String,
    headers: HeaderMap,
    payload: Option<Value>,
}

impl HttpError {
    /// Builds an error with an explicit status and detail message.
    ///
    /// Statuses outside 4xx/5xx are coerced to `500 Internal Server Error`.
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        let status = if status.is_client_error() || status.is_server_error() {
            status
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self { status, detail: detail.into(), headers: HeaderMap::new(), payload: None }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, detail)
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, detail)
    }

    /// `404 Not Found` with the reason phrase as detail.
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found")
    }

    pub fn unsupported_media_type(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNSUPPORTED_MEDIA_TYPE, detail)
    }

    /// `500 Internal Server Error`. The detail never leaks internals.
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "An internal server error occurred")
    }

    pub fn status(&self) -> StatusCode { self.status }

    /// Short error name, e.g. `"Not Found"`.
    pub fn title(&self) -> &str {
        self.status.canonical_reason().unwrap_or("Unknown")
    }

    pub fn detail(&self) -> &str { &self.detail }

    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn headers_mut(&mut self) -> &mut HeaderMap { &mut self.headers }

    /// The body override set by a middleware, if any.
    pub fn payload(&self) -> Option<&Value> { self.payload.as_ref() }

    /// Replaces the rendered body. The status code is kept.
    pub fn set_payload(&mut self, payload: Value) {
        self.payload = Some(payload);
    }

    pub(crate) fn into_parts(self) -> (StatusCode, HeaderMap, Value) {
        let payload = match self.payload {
            Some(payload) => payload,
            None => json!({
                "statusCode": self.status.as_u16(),
                "error": self.title(),
                "message": self.detail,
            }),
        };
        let mut headers = self.headers;
        headers
            .entry(header::CONTENT_TYPE)
            .or_insert(HeaderValue::from_static("application/json; charset=utf-8"));
        (self.status, headers, payload)
    }
}
