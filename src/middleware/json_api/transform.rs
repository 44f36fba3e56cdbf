//! Reshapes outgoing responses for JSON:API clients.

use http::header::{self, HeaderValue};
use serde_json::{Map, Value, json};

use super::MEDIA_TYPE;
use crate::error::HttpError;
use crate::response::{Body, Reply, Response};

/// One entry of the `errors` array.
#[derive(Debug)]
pub struct ErrorObject<'a> {
    pub title: &'a str,
    pub status: u16,
    pub detail: &'a str,
}

/// The `{errors, meta}` document sent for a failed request.
#[derive(Debug)]
pub struct ErrorEnvelope<'a> {
    pub errors: [ErrorObject<'a>; 1],
    pub meta: &'a Value,
}

impl ErrorEnvelope<'_> {
    pub fn to_value(&self) -> Value {
        let errors: Vec<Value> = self
            .errors
            .iter()
            .map(|e| json!({ "title": e.title, "status": e.status, "detail": e.detail }))
            .collect();
        json!({ "errors": errors, "meta": self.meta })
    }
}

/// `{id, ...configured}`. Configured keys are spread last and win.
pub fn build_meta(request_id: &str, configured: &Map<String, Value>) -> Value {
    let mut meta = Map::with_capacity(configured.len() + 1);
    meta.insert("id".to_owned(), Value::String(request_id.to_owned()));
    meta.extend(configured.iter().map(|(k, v)| (k.clone(), v.clone())));
    Value::Object(meta)
}

/// Rewrites `response` in place.
///
/// Errors get the envelope; replies get `meta` on object payloads. Both get
/// the JSON:API content type.
pub fn transform_response(response: &mut Response, meta: Value) {
    match response {
        Response::Error(err) => envelope_error(err, &meta),
        Response::Reply(reply) => stamp_reply(reply, meta),
    }
}

fn envelope_error(err: &mut HttpError, meta: &Value) {
    let envelope = ErrorEnvelope {
        errors: [ErrorObject {
            title: err.title(),
            status: err.status().as_u16(),
            detail: err.detail(),
        }],
        meta,
    };
    err.set_payload(envelope.to_value());
    err.headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(MEDIA_TYPE));
}

fn stamp_reply(reply: &mut Reply, meta: Value) {
    if let Body::Json(Value::Object(document)) = reply.body_mut() {
        document.insert("meta".to_owned(), meta);
    }
    reply
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(MEDIA_TYPE));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    fn configured() -> Map<String, Value> {
        let Value::Object(map) = json!({ "test": true }) else { unreachable!() };
        map
    }

    #[test]
    fn meta_starts_with_id() {
        assert_eq!(build_meta("r1", &Map::new()), json!({ "id": "r1" }));
        assert_eq!(build_meta("r1", &configured()), json!({ "id": "r1", "test": true }));
    }

    #[test]
    fn configured_id_overrides_request_id() {
        let Value::Object(map) = json!({ "id": "fixed" }) else { unreachable!() };
        assert_eq!(build_meta("r1", &map), json!({ "id": "fixed" }));
    }

    #[test]
    fn error_becomes_envelope() {
        let mut res = Response::from(HttpError::unauthorized("need auth"));
        transform_response(&mut res, build_meta("r1", &configured()));

        let Response::Error(err) = &res else { panic!("still an error") };
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.headers()[header::CONTENT_TYPE], MEDIA_TYPE);
        assert_eq!(
            err.payload(),
            Some(&json!({
                "errors": [{ "title": "Unauthorized", "status": 401, "detail": "need auth" }],
                "meta": { "id": "r1", "test": true },
            }))
        );
    }

    #[test]
    fn envelope_keeps_non_object_meta_and_empty_detail() {
        let meta = json!("plain");
        let envelope = ErrorEnvelope {
            errors: [ErrorObject { title: "Internal Server Error", status: 500, detail: "" }],
            meta: &meta,
        };
        assert_eq!(
            envelope.to_value(),
            json!({
                "errors": [{ "title": "Internal Server Error", "status": 500, "detail": "" }],
                "meta": "plain",
            })
        );
    }

    #[test]
    fn object_reply_gains_meta() {
        let mut res = Response::json(json!({ "data": { "id": "ok", "type": "response" } }));
        transform_response(&mut res, build_meta("r1", &Map::new()));

        let Response::Reply(reply) = &res else { panic!("expected reply") };
        assert_eq!(reply.headers()[header::CONTENT_TYPE], MEDIA_TYPE);
        assert_eq!(
            reply.body(),
            &Body::Json(json!({ "data": { "id": "ok", "type": "response" }, "meta": { "id": "r1" } }))
        );
    }

    #[test]
    fn empty_reply_only_gets_content_type() {
        let mut res = Response::status(StatusCode::NO_CONTENT);
        transform_response(&mut res, build_meta("r1", &Map::new()));

        let Response::Reply(reply) = &res else { panic!("expected reply") };
        assert_eq!(reply.body(), &Body::Empty);
        assert_eq!(reply.headers()[header::CONTENT_TYPE], MEDIA_TYPE);
    }

    #[test]
    fn non_object_payloads_untouched() {
        let mut res = Response::json(json!([1, 2]));
        transform_response(&mut res, build_meta("r1", &Map::new()));
        let Response::Reply(reply) = &res else { panic!("expected reply") };
        assert_eq!(reply.body(), &Body::Json(json!([1, 2])));

        let mut res = Response::text("ok");
        transform_response(&mut res, build_meta("r1", &Map::new()));
        let Response::Reply(reply) = &res else { panic!("expected reply") };
        assert_eq!(reply.body(), &Body::Bytes("ok".into()));
        assert_eq!(reply.headers()[header::CONTENT_TYPE], MEDIA_TYPE);
    }
}
