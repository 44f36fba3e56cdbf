//! Middleware layer.
//!
//! Middleware intercepts a request at two points of its lifecycle:
//!
//! ```text
//! request ─▶ routing ─▶ pre_handler ─▶ handler ─▶ pre_response ─▶ wire
//!                │            │                        ▲
//!                └── 404 ─────┴── error ───────────────┘
//! ```
//!
//! - [`Middleware::pre_handler`] runs after routing, before the handler.
//!   Returning an [`HttpError`] short-circuits: the handler is never called
//!   and the error continues down the normal response path.
//! - [`Middleware::pre_response`] runs for every routed or unrouted request
//!   once a [`Response`] exists, including errors raised by `pre_handler`.
//!
//! Both hooks run in registration order. Built-in middleware:
//!
//! - [`json_api`] — JSON:API content negotiation and error envelopes

use crate::error::HttpError;
use crate::request::RequestHead;
use crate::response::Response;

pub mod json_api;

/// A request-lifecycle extension.
///
/// Implementations hold only immutable configuration; the same instance
/// serves every concurrent request.
pub trait Middleware: Send + Sync + 'static {
    /// Inspect the request before the handler runs.
    fn pre_handler(&self, _head: &RequestHead) -> Result<(), HttpError> {
        Ok(())
    }

    /// Inspect or rewrite the response before it is serialized.
    fn pre_response(&self, _head: &RequestHead, _response: &mut Response) {}
}
