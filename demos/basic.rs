//! Minimal JSON:API service.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! Try:
//!   curl -H 'accept: application/vnd.api+json' http://localhost:3000/posts/42
//!   curl -X POST http://localhost:3000/posts \
//!        -H 'accept: application/vnd.api+json' \
//!        -H 'content-type: application/vnd.api+json' \
//!        -d '{"data":{"type":"post","attributes":{"title":"hello"}}}'
//!   curl -X POST http://localhost:3000/posts \
//!        -H 'accept: application/vnd.api+json' \
//!        -H 'content-type: application/json' -d '{}'          # 415
//!   curl -H 'accept: application/vnd.api+json' http://localhost:3000/nope   # 404 envelope

use http::{Method, StatusCode};
use jsonapi_guard::middleware::json_api::{JsonApi, JsonApiOptions};
use jsonapi_guard::{HttpError, Request, Response, Router, Server};
use serde_json::{Value, json};

#[tokio::main]
async fn main() -> Result<(), jsonapi_guard::Error> {
    tracing_subscriber::fmt::init();

    let options: JsonApiOptions = serde_json::from_value(json!({
        "meta": { "service": "posts", "version": env!("CARGO_PKG_VERSION") }
    }))
    .unwrap_or_default();

    let app = Router::new()
        .on(Method::GET,    "/posts/{id}", get_post)
        .on(Method::POST,   "/posts",      create_post)
        .on(Method::DELETE, "/posts/{id}", delete_post)
        .middleware(JsonApi::new(options));

    Server::bind("0.0.0.0:3000").serve(app).await
}

// GET /posts/{id}
async fn get_post(req: Request) -> Result<Response, HttpError> {
    let id = req.param("id").ok_or_else(HttpError::not_found)?;
    if id == "0" {
        return Err(HttpError::not_found());
    }
    Ok(Response::json(json!({
        "data": { "id": id, "type": "post", "attributes": { "title": "hello" } }
    })))
}

// POST /posts → 201 Created
async fn create_post(req: Request) -> Result<Response, HttpError> {
    let mut doc: Value = req
        .json()
        .map_err(|e| HttpError::bad_request(format!("invalid document: {e}")))?;
    let data = doc
        .get_mut("data")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| HttpError::bad_request("missing primary data"))?;
    data.insert("id".to_owned(), json!("99"));

    Ok(Response::builder()
        .status(StatusCode::CREATED)
        .header("location", "/posts/99")
        .json(doc))
}

// DELETE /posts/{id} → 204 No Content
async fn delete_post(_req: Request) -> StatusCode {
    StatusCode::NO_CONTENT
}
