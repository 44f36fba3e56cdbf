//! Route handlers.
//!
//! This is where a handler's output is settled into a tagged [`Response`]:
//! whatever the handler returns goes through [`IntoResponse`] once, so
//! middleware only ever sees `Response::Reply` or `Response::Error`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::debug;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// What the router stores per route.
pub(crate) type BoxedHandler = Arc<dyn Fn(Request) -> BoxFuture + Send + Sync>;

/// A route handler.
///
/// Any `async fn(Request) -> impl IntoResponse` (or closure of that shape)
/// is one. Implement it by hand for handlers that carry state.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request) -> impl Future<Output = Response> + Send;
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn call(&self, req: Request) -> impl Future<Output = Response> + Send {
        let head = Arc::clone(&req.head);
        let fut = self(req);
        async move {
            let response = fut.await.into_response();
            if let Response::Error(err) = &response {
                debug!(
                    request_id = head.id(),
                    status = err.status().as_u16(),
                    "handler failed: {}",
                    err.detail()
                );
            }
            response
        }
    }
}

pub(crate) fn boxed<H: Handler>(handler: H) -> BoxedHandler {
    let handler = Arc::new(handler);
    Arc::new(move |req| {
        let handler = Arc::clone(&handler);
        Box::pin(async move { handler.call(req).await })
    })
}
