//! Content-Type validation for JSON:API requests.
//!
//! Only `application/vnd.api+json` with no media type parameters is
//! accepted. `charset=UTF-8` is tolerated and ignored, see
//! <https://github.com/json-api/json-api/issues/837>.

use http::HeaderValue;

use crate::error::HttpError;
use crate::media_type::{MediaType, ParseMediaTypeError};

/// Detail sent with every `415` raised here.
pub const UNSUPPORTED_DETAIL: &str = "Only `application/vnd.api+json` content-type supported";

/// Why a `Content-Type` was refused.
#[derive(Debug, thiserror::Error)]
pub enum ContentTypeError {
    #[error("content-type is not visible ASCII")]
    NotAscii,
    #[error("malformed content-type: {0}")]
    Malformed(#[from] ParseMediaTypeError),
    #[error("unsupported content-type `{0}`")]
    Unsupported(MediaType),
}

/// Always a `415` carrying [`UNSUPPORTED_DETAIL`], whatever the variant.
/// The specific reason never reaches the client; `JsonApi::pre_handler`
/// logs it at `debug` before converting.
impl From<ContentTypeError> for HttpError {
    fn from(_: ContentTypeError) -> Self {
        HttpError::unsupported_media_type(UNSUPPORTED_DETAIL)
    }
}

/// Validate a request's `Content-Type` header value.
///
/// An absent header passes: body-less requests are never rejected for it.
pub fn validate_content_type(value: Option<&HeaderValue>) -> Result<(), ContentTypeError> {
    let Some(value) = value else {
        return Ok(());
    };
    let value = value.to_str().map_err(|_| ContentTypeError::NotAscii)?;
    let mut media: MediaType = value.parse()?;

    if media.parameter("charset") == Some("UTF-8") {
        media.parameters.remove("charset");
    }

    if is_json_api(&media) {
        Ok(())
    } else {
        Err(ContentTypeError::Unsupported(media))
    }
}

fn is_json_api(media: &MediaType) -> bool {
    media.type_ == "application"
        && media.subtype == "vnd.api"
        && media.suffix.as_deref() == Some("json")
        && media.parameters.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    fn check(value: &'static str) -> Result<(), ContentTypeError> {
        validate_content_type(Some(&HeaderValue::from_static(value)))
    }

    #[test]
    fn absent_passes() {
        assert!(validate_content_type(None).is_ok());
    }

    #[test]
    fn exact_media_type_passes() {
        assert!(check("application/vnd.api+json").is_ok());
        assert!(check("Application/VND.API+JSON").is_ok());
    }

    #[test]
    fn charset_utf8_is_ignored() {
        assert!(check("application/vnd.api+json; charset=UTF-8").is_ok());
        assert!(check("application/vnd.api+json;charset=UTF-8").is_ok());
    }

    #[test]
    fn other_charsets_rejected() {
        assert!(matches!(check("application/vnd.api+json; charset=utf-8"), Err(ContentTypeError::Unsupported(_))));
        assert!(matches!(check("application/vnd.api+json; charset=ISO-8859-1"), Err(ContentTypeError::Unsupported(_))));
        assert!(matches!(check("application/vnd.api+json; Charset=UTF-8"), Err(ContentTypeError::Unsupported(_))));
    }

    #[test]
    fn any_other_parameter_rejected() {
        assert!(check("application/vnd.api+json;q=0.9").is_err());
        assert!(check("application/vnd.api+json; charset=UTF-8; ext=bulk").is_err());
        assert!(check("application/vnd.api+json; profile=\"https://example.com\"").is_err());
    }

    #[test]
    fn wrong_type_or_subtype_rejected() {
        assert!(check("text/json").is_err());
        assert!(check("application/json").is_err());
        assert!(check("application/vnd.api").is_err());
        assert!(check("application/vnd.api+xml").is_err());
        assert!(check("text/vnd.api+json").is_err());
    }

    #[test]
    fn empty_or_malformed_rejected() {
        assert!(matches!(check(""), Err(ContentTypeError::Malformed(_))));
        assert!(matches!(check("vnd.api+json"), Err(ContentTypeError::Malformed(_))));
    }

    #[test]
    fn maps_to_415() {
        let err: HttpError = check("application/json").unwrap_err().into();
        assert_eq!(err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(err.title(), "Unsupported Media Type");
        assert_eq!(err.detail(), UNSUPPORTED_DETAIL);
    }
}
