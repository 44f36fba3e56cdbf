//! JSON:API content negotiation and error envelopes.
//!
//! For requests whose `Accept` header mentions `application/vnd.api+json`:
//!
//! - **pre-handler** — a `Content-Type` other than `application/vnd.api+json`
//!   (optionally with `charset=UTF-8`) is refused with `415`.
//! - **pre-response** — errors become
//!   `{"errors":[{"title","status","detail"}],"meta":{"id",…}}`, JSON object
//!   replies gain `meta`, and every response is sent as
//!   `application/vnd.api+json`.
//!
//! Other requests and every `OPTIONS` request pass through untouched.
//!
//! ```rust,no_run
//! use http::Method;
//! use jsonapi_guard::middleware::json_api::{JsonApi, JsonApiOptions};
//! use jsonapi_guard::{Request, Response, Router};
//!
//! async fn list(_req: Request) -> Response {
//!     Response::json(serde_json::json!({ "data": [] }))
//! }
//!
//! let options: JsonApiOptions = serde_json::from_str(r#"{"meta":{"version":"1"}}"#).unwrap();
//! let app = Router::new()
//!     .on(Method::GET, "/posts", list)
//!     .middleware(JsonApi::new(options));
//! ```

use http::{Method, header};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::HttpError;
use crate::middleware::Middleware;
use crate::request::RequestHead;
use crate::response::Response;

mod accept;
mod content_type;
mod transform;

pub use accept::accepts_json_api;
pub use content_type::{ContentTypeError, UNSUPPORTED_DETAIL, validate_content_type};
pub use transform::{ErrorEnvelope, ErrorObject, build_meta, transform_response};

/// The JSON:API media type.
pub const MEDIA_TYPE: &str = "application/vnd.api+json";

/// Registration options.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct JsonApiOptions {
    /// Extra fields merged into every response's `meta` object.
    #[serde(default)]
    pub meta: Map<String, Value>,
}

/// The JSON:API middleware. Register it with
/// [`Router::middleware`](crate::Router::middleware).
#[derive(Clone, Debug, Default)]
pub struct JsonApi {
    options: JsonApiOptions,
}

impl JsonApi {
    pub fn new(options: JsonApiOptions) -> Self {
        Self { options }
    }

    /// Shorthand for `JsonApi::new(JsonApiOptions { meta })`.
    pub fn with_meta(meta: Map<String, Value>) -> Self {
        Self::new(JsonApiOptions { meta })
    }

    fn applies_to(head: &RequestHead) -> bool {
        head.method() != Method::OPTIONS && accepts_json_api(head)
    }
}

impl Middleware for JsonApi {
    fn pre_handler(&self, head: &RequestHead) -> Result<(), HttpError> {
        if !Self::applies_to(head) {
            return Ok(());
        }
        validate_content_type(head.headers().get(header::CONTENT_TYPE)).map_err(|e| {
            debug!(request_id = head.id(), path = head.path(), "rejecting request: {e}");
            HttpError::from(e)
        })
    }

    fn pre_response(&self, head: &RequestHead, response: &mut Response) {
        if !Self::applies_to(head) {
            return;
        }
        trace!(
            request_id = head.id(),
            status = response.status_code().as_u16(),
            error = response.is_error(),
            "formatting JSON:API response"
        );
        transform_response(response, build_meta(head.id(), &self.options.meta));
    }
}
