//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! A [`Response`] is decided once, at the handler boundary, to be either a
//! [`Reply`] or an [`HttpError`]. Middleware matches on that tag instead of
//! sniffing the shape of the body.

use bytes::Bytes;
use http::header::{self, HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode};
use http_body_util::Full;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, warn};

use crate::error::HttpError;

// ── ContentType ───────────────────────────────────────────────────────────────

/// Common content-type values for use with [`ResponseBuilder::bytes`].
pub enum ContentType {
    Html,         // text/html; charset=utf-8
    Json,         // application/json
    JsonApi,      // application/vnd.api+json
    OctetStream,  // application/octet-stream
    Text,         // text/plain; charset=utf-8
    Xml,          // application/xml
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html        => "text/html; charset=utf-8",
            Self::Json        => "application/json",
            Self::JsonApi     => "application/vnd.api+json",
            Self::OctetStream => "application/octet-stream",
            Self::Text        => "text/plain; charset=utf-8",
            Self::Xml         => "application/xml",
        }
    }
}

// ── Body ──────────────────────────────────────────────────────────────────────

/// Payload of a successful reply.
///
/// JSON stays structured until the response is written, so middleware can
/// amend it.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Body {
    #[default]
    Empty,
    Bytes(Bytes),
    Json(Value),
}

// ── Reply ─────────────────────────────────────────────────────────────────────

/// A successful (non-error) response.
#[derive(Clone, Debug)]
pub struct Reply {
    pub(crate) status: StatusCode,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Body,
}

impl Reply {
    pub fn status(&self) -> StatusCode { self.status }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn headers_mut(&mut self) -> &mut HeaderMap { &mut self.headers }
    pub fn body(&self) -> &Body { &self.body }
    pub fn body_mut(&mut self) -> &mut Body { &mut self.body }
}

// ── Response ──────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// # Shortcuts (200 OK, no custom headers needed)
///
/// ```rust
/// use http::StatusCode;
/// use jsonapi_guard::Response;
///
/// Response::json(serde_json::json!({ "data": null }));
/// Response::text("hello");
/// Response::status(StatusCode::NO_CONTENT);
/// ```
///
/// # Builder (custom status or headers)
///
/// ```rust
/// use http::StatusCode;
/// use jsonapi_guard::{ContentType, Response};
///
/// Response::builder()
///     .status(StatusCode::CREATED)
///     .header("location", "/posts/42")
///     .json(serde_json::json!({ "data": { "id": "42", "type": "post" } }));
///
/// Response::builder().bytes(ContentType::Xml, "<ok/>");
/// ```
#[derive(Clone, Debug)]
pub enum Response {
    Reply(Reply),
    Error(HttpError),
}

impl Response {
    /// `200 OK` — `application/json`.
    ///
    /// Serialization failures turn into a `500` error response.
    pub fn json<T: Serialize>(body: T) -> Self {
        Self::builder().json(body)
    }

    /// `200 OK` — `text/plain; charset=utf-8`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::builder().text(body)
    }

    /// Response with no body.
    pub fn status(code: StatusCode) -> Self {
        Self::builder().status(code).no_body()
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { headers: HeaderMap::new(), status: StatusCode::OK, invalid: None }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Reply(reply) => reply.status,
            Self::Error(err) => err.status(),
        }
    }

    pub fn headers(&self) -> &HeaderMap {
        match self {
            Self::Reply(reply) => reply.headers(),
            Self::Error(err) => err.headers(),
        }
    }

    /// Serializes into the hyper response written to the wire.
    pub(crate) fn into_http(self) -> http::Response<Full<Bytes>> {
        let (status, headers, body) = match self {
            Self::Reply(reply) => {
                let body = match reply.body {
                    Body::Empty => Bytes::new(),
                    Body::Bytes(bytes) => bytes,
                    Body::Json(value) => match serde_json::to_vec(&value) {
                        Ok(bytes) => Bytes::from(bytes),
                        Err(e) => {
                            error!("failed to serialize response body: {e}");
                            return Self::Error(HttpError::internal()).into_http();
                        }
                    },
                };
                (reply.status, reply.headers, body)
            }
            Self::Error(err) => {
                let (status, headers, payload) = err.into_parts();
                let body = match serde_json::to_vec(&payload) {
                    Ok(bytes) => Bytes::from(bytes),
                    Err(e) => {
                        error!("failed to serialize error body: {e}");
                        Bytes::new()
                    }
                };
                (status, headers, body)
            }
        };

        let mut res = http::Response::new(Full::new(body));
        *res.status_mut() = status;
        *res.headers_mut() = headers;
        res
    }
}

impl From<HttpError> for Response {
    fn from(err: HttpError) -> Self { Self::Error(err) }
}

impl From<Reply> for Response {
    fn from(reply: Reply) -> Self { Self::Reply(reply) }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `200 OK`.
/// Terminated by a typed body method — you always know what you're sending.
/// A header that fails to parse turns the result into a `500` error.
pub struct ResponseBuilder {
    headers: HeaderMap,
    status: StatusCode,
    invalid: Option<http::Error>,
}

impl ResponseBuilder {
    pub fn status(mut self, code: StatusCode) -> Self {
        self.status = code;
        self
    }

    pub fn header<K, V>(mut self, name: K, value: V) -> Self
    where
        K: TryInto<HeaderName>,
        K::Error: Into<http::Error>,
        V: TryInto<HeaderValue>,
        V::Error: Into<http::Error>,
    {
        if self.invalid.is_some() {
            return self;
        }
        match (name.try_into(), value.try_into()) {
            (Ok(name), Ok(value)) => {
                self.headers.append(name, value);
            }
            (Err(e), _) => self.invalid = Some(e.into()),
            (_, Err(e)) => self.invalid = Some(e.into()),
        }
        self
    }

    /// Terminate with a JSON body (`application/json`).
    pub fn json<T: Serialize>(self, body: T) -> Response {
        match serde_json::to_value(body) {
            Ok(value) => self.finish(ContentType::Json.as_str(), Body::Json(value)),
            Err(e) => {
                error!("failed to serialize response body: {e}");
                HttpError::internal().into()
            }
        }
    }

    /// Terminate with a plain-text body (`text/plain; charset=utf-8`).
    pub fn text(self, body: impl Into<String>) -> Response {
        self.finish(ContentType::Text.as_str(), Body::Bytes(Bytes::from(body.into())))
    }

    /// Terminate with a typed body. Use this for XML, HTML, binary, etc.
    pub fn bytes(self, content_type: ContentType, body: impl Into<Bytes>) -> Response {
        self.finish(content_type.as_str(), Body::Bytes(body.into()))
    }

    /// Terminate with no body (e.g. `204 No Content`, redirects).
    pub fn no_body(self) -> Response {
        self.build(Body::Empty)
    }

    fn finish(mut self, content_type: &'static str, body: Body) -> Response {
        self.headers
            .entry(header::CONTENT_TYPE)
            .or_insert(HeaderValue::from_static(content_type));
        self.build(body)
    }

    fn build(self, body: Body) -> Response {
        if let Some(e) = self.invalid {
            warn!("invalid response header: {e}");
            return HttpError::internal().into();
        }
        Response::Reply(Reply { status: self.status, headers: self.headers, body })
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Implement on your own types to return them directly from handlers.
/// `Result<T, HttpError>` works out of the box, so `?` on an [`HttpError`]
/// inside a handler does the right thing.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response { Response::Error(self) }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for Value {
    fn into_response(self) -> Response { Response::json(self) }
}

/// Return a status directly from a handler: `return StatusCode::NO_CONTENT`.
impl IntoResponse for StatusCode {
    fn into_response(self) -> Response { Response::status(self) }
}

impl<T: IntoResponse> IntoResponse for Result<T, HttpError> {
    fn into_response(self) -> Response {
        match self {
            Ok(ok) => ok.into_response(),
            Err(err) => Response::Error(err),
        }
    }
}
