//! Incoming HTTP request types.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderMap, Method};

/// The parts of a request every lifecycle stage can see: method, path,
/// headers and the id assigned on arrival.
///
/// Shared behind an `Arc` so the pre-response stage still has it after the
/// handler has consumed the [`Request`].
#[derive(Debug)]
pub struct RequestHead {
    method: Method,
    path: String,
    headers: HeaderMap,
    id: String,
}

impl RequestHead {
    pub fn new(method: Method, path: impl Into<String>, headers: HeaderMap, id: impl Into<String>) -> Self {
        Self { method, path: path.into(), headers, id: id.into() }
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &HeaderMap { &self.headers }

    /// Unique per request.
    pub fn id(&self) -> &str { &self.id }

    /// Case-insensitive header lookup.
    ///
    /// `None` when the header is absent or its value is not visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// An incoming HTTP request, as handed to a route handler.
pub struct Request {
    pub(crate) head: Arc<RequestHead>,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(head: Arc<RequestHead>, body: Bytes, params: HashMap<String, String>) -> Self {
        Self { head, body, params }
    }

    pub fn head(&self) -> &RequestHead { &self.head }
    pub fn method(&self) -> &Method { self.head.method() }
    pub fn path(&self) -> &str { self.head.path() }
    pub fn headers(&self) -> &HeaderMap { self.head.headers() }
    pub fn id(&self) -> &str { self.head.id() }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.header(name)
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/posts/{id}`, `req.param("id")` on `/posts/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Deserializes the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn header_lookup_ignores_case() {
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("application/vnd.api+json"));
        let head = RequestHead::new(Method::GET, "/", headers, "req-1");

        assert_eq!(head.header("Accept"), Some("application/vnd.api+json"));
        assert_eq!(head.header("ACCEPT"), Some("application/vnd.api+json"));
        assert_eq!(head.header("content-type"), None);
    }

    #[test]
    fn params_and_body() {
        let head = Arc::new(RequestHead::new(Method::POST, "/posts/7", HeaderMap::new(), "req-2"));
        let params = HashMap::from([("id".to_owned(), "7".to_owned())]);
        let req = Request::new(head, Bytes::from_static(br#"{"n":1}"#), params);

        assert_eq!(req.param("id"), Some("7"));
        assert_eq!(req.param("missing"), None);
        assert_eq!(req.id(), "req-2");
        let value: serde_json::Value = req.json().unwrap();
        assert_eq!(value["n"], 1);
    }
}
