//! # jsonapi-guard
//!
//! A minimal hyper HTTP framework with a JSON:API guard built in.
//!
//! ## The contract
//!
//! Clients that send `Accept: application/vnd.api+json` get the JSON:API
//! treatment from [`middleware::json_api::JsonApi`]:
//!
//! - request bodies must be `Content-Type: application/vnd.api+json`
//!   (`charset=UTF-8` is tolerated), anything else is a `415`;
//! - every error leaves as `{"errors":[{"title","status","detail"}],"meta":{"id",…}}`;
//! - every reply leaves as `application/vnd.api+json`, JSON documents with a
//!   `meta` object carrying the request id and any configured fields.
//!
//! Everyone else, and every `OPTIONS` preflight, is left alone.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use http::{Method, StatusCode};
//! use jsonapi_guard::middleware::json_api::JsonApi;
//! use jsonapi_guard::{HttpError, Request, Response, Router, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), jsonapi_guard::Error> {
//!     let app = Router::new()
//!         .on(Method::GET,  "/posts/{id}", get_post)
//!         .on(Method::POST, "/posts",      create_post)
//!         .middleware(JsonApi::default());
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await
//! }
//!
//! async fn get_post(req: Request) -> Result<Response, HttpError> {
//!     let id = req.param("id").ok_or_else(HttpError::not_found)?;
//!     Ok(Response::json(serde_json::json!({ "data": { "id": id, "type": "post" } })))
//! }
//!
//! async fn create_post(req: Request) -> Result<Response, HttpError> {
//!     let doc: serde_json::Value = req
//!         .json()
//!         .map_err(|e| HttpError::bad_request(e.to_string()))?;
//!     Ok(Response::builder()
//!         .status(StatusCode::CREATED)
//!         .header("location", "/posts/99")
//!         .json(doc))
//! }
//! ```

mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;

pub mod media_type;
pub mod middleware;

pub use error::{Error, HttpError};
pub use handler::Handler;
pub use http::{Method, StatusCode};
pub use media_type::MediaType;
pub use request::{Request, RequestHead};
pub use response::{Body, ContentType, IntoResponse, Reply, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
