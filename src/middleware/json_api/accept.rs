//! Does the caller want a JSON:API response?

use http::header;

use super::MEDIA_TYPE;
use crate::request::RequestHead;

/// True when any `Accept` header line mentions `application/vnd.api+json`
/// anywhere in its raw bytes.
///
/// This is a substring test, not `Accept` negotiation: quality values and
/// other listed types are ignored. Repeated `Accept` lines count as one list
/// and non-ASCII bytes elsewhere in a value do not hide the match.
pub fn accepts_json_api(head: &RequestHead) -> bool {
    let needle = MEDIA_TYPE.as_bytes();
    head.headers()
        .get_all(header::ACCEPT)
        .iter()
        .any(|accept| accept.as_bytes().windows(needle.len()).any(|w| w == needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderMap, HeaderValue, Method};

    fn head(accept: Option<&'static str>) -> RequestHead {
        let mut headers = HeaderMap::new();
        if let Some(accept) = accept {
            headers.insert(header::ACCEPT, HeaderValue::from_static(accept));
        }
        RequestHead::new(Method::GET, "/", headers, "id")
    }

    #[test]
    fn missing_accept() {
        assert!(!accepts_json_api(&head(None)));
    }

    #[test]
    fn exact_accept() {
        assert!(accepts_json_api(&head(Some("application/vnd.api+json"))));
    }

    #[test]
    fn listed_among_others() {
        assert!(accepts_json_api(&head(Some("text/html, application/vnd.api+json;q=0.5"))));
    }

    #[test]
    fn other_types() {
        assert!(!accepts_json_api(&head(Some("text/plain"))));
        assert!(!accepts_json_api(&head(Some("application/json"))));
        assert!(!accepts_json_api(&head(Some("*/*"))));
    }

    #[test]
    fn repeated_accept_lines() {
        let mut headers = HeaderMap::new();
        headers.append(header::ACCEPT, HeaderValue::from_static("text/html"));
        headers.append(header::ACCEPT, HeaderValue::from_static("application/vnd.api+json"));
        assert!(accepts_json_api(&RequestHead::new(Method::POST, "/", headers, "id")));
    }

    #[test]
    fn non_ascii_bytes_elsewhere_in_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_bytes(b"application/vnd.api+json, text/\xe9").unwrap(),
        );
        assert!(accepts_json_api(&RequestHead::new(Method::POST, "/", headers, "id")));
    }

    #[test]
    fn substring_is_case_sensitive() {
        assert!(!accepts_json_api(&head(Some("application/VND.API+JSON"))));
    }
}
