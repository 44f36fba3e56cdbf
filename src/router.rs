//! Radix-tree request router and the request lifecycle.
//!
//! One tree per HTTP method, O(path-length) lookup. Middleware registered on
//! the router wraps every request; see [`crate::middleware`] for the order
//! the hooks run in.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderValue, Method, StatusCode, header};
use http_body_util::{BodyExt, Full};
use matchit::Router as MatchitRouter;
use tracing::debug;

use crate::error::HttpError;
use crate::handler::{BoxedHandler, Handler, boxed};
use crate::middleware::Middleware;
use crate::request::{Request, RequestHead};
use crate::response::Response;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve)
/// or drive it directly with [`Router::handle`]. Registration methods return
/// `self` so calls chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    middleware: Vec<Arc<dyn Middleware>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), middleware: Vec::new() }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax — `req.param("name")` retrieves them:
    ///
    /// ```rust,no_run
    /// # use http::Method;
    /// # use jsonapi_guard::{Request, Response, Router};
    /// # async fn get_post(_: Request) -> Response { Response::text("") }
    /// # async fn create_post(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::GET,  "/posts/{id}", get_post)
    ///     .on(Method::POST, "/posts",      create_post);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with an existing one.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, boxed(handler))
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Append a middleware. Hooks run in registration order.
    pub fn middleware(mut self, middleware: impl Middleware) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Runs one request through routing, middleware and the handler.
    ///
    /// The server calls this for every request on a connection; tests can
    /// call it directly with an in-memory body.
    pub async fn handle<B>(&self, req: http::Request<B>) -> http::Response<Full<Bytes>>
    where
        B: hyper::body::Body<Data = Bytes>,
        B::Error: std::fmt::Display,
    {
        let (parts, body) = req.into_parts();
        let head = Arc::new(RequestHead::new(
            parts.method,
            parts.uri.path(),
            parts.headers,
            uuid::Uuid::new_v4().to_string(),
        ));

        let mut response = self.respond(&head, body).await;
        for middleware in &self.middleware {
            middleware.pre_response(&head, &mut response);
        }
        response.into_http()
    }

    async fn respond<B>(&self, head: &Arc<RequestHead>, body: B) -> Response
    where
        B: hyper::body::Body<Data = Bytes>,
        B::Error: std::fmt::Display,
    {
        let Some((handler, params)) = self.lookup(head.method(), head.path()) else {
            if head.method() == Method::OPTIONS {
                return self.preflight(head.path());
            }
            return HttpError::not_found().into();
        };

        for middleware in &self.middleware {
            if let Err(err) = middleware.pre_handler(head) {
                return err.into();
            }
        }

        let body = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                debug!(request_id = head.id(), "failed to read request body: {e}");
                return HttpError::bad_request("Invalid request payload").into();
            }
        };

        handler(Request::new(Arc::clone(head), body, params)).await
    }

    /// Answers an `OPTIONS` request for a path that has no explicit handler.
    fn preflight(&self, path: &str) -> Response {
        let allowed = self.allowed_methods(path);
        if allowed.is_empty() {
            return HttpError::not_found().into();
        }
        let allow = allowed.iter().map(Method::as_str).collect::<Vec<_>>().join(", ");
        match HeaderValue::from_str(&allow) {
            Ok(allow) => Response::builder()
                .status(StatusCode::NO_CONTENT)
                .header(header::ALLOW, allow)
                .no_body(),
            Err(_) => HttpError::internal().into(),
        }
    }

    /// Methods with a route matching `path`, sorted by name.
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let mut methods: Vec<Method> = self
            .routes
            .iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(method, _)| method.clone())
            .collect();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        methods
    }

    pub(crate) fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
