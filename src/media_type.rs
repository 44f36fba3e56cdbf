//! `type/subtype+suffix; name=value` media type parsing.
//!
//! Just enough of RFC 9110 §8.3.1 to inspect a single `Content-Type` value.
//! Type, subtype and suffix are case-insensitive and stored lowercased.
//! Parameter names and values are kept exactly as sent.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A parsed media type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaType {
    pub type_: String,
    pub subtype: String,
    pub suffix: Option<String>,
    pub parameters: BTreeMap<String, String>,
}

/// Why a media type string could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseMediaTypeError {
    #[error("empty media type")]
    Empty,
    #[error("missing `/` between type and subtype")]
    MissingSlash,
    #[error("invalid token `{0}`")]
    InvalidToken(String),
    #[error("parameter `{0}` has no value")]
    MissingValue(String),
    #[error("unterminated quoted string in parameter `{0}`")]
    UnterminatedQuote(String),
    #[error("duplicate parameter `{0}`")]
    DuplicateParameter(String),
}

impl MediaType {
    pub fn new(type_: &str, subtype: &str) -> Self {
        Self {
            type_: type_.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
            suffix: None,
            parameters: BTreeMap::new(),
        }
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }
}

impl FromStr for MediaType {
    type Err = ParseMediaTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseMediaTypeError::Empty);
        }

        let (essence, mut rest) = match s.find(';') {
            Some(i) => (&s[..i], &s[i..]),
            None => (s, ""),
        };

        let (type_, full_subtype) = essence
            .trim_end()
            .split_once('/')
            .ok_or(ParseMediaTypeError::MissingSlash)?;
        let (subtype, suffix) = match full_subtype.rsplit_once('+') {
            Some((subtype, suffix)) => (subtype, Some(token(suffix)?)),
            None => (full_subtype, None),
        };

        let mut media = MediaType::new(token(type_)?, token(subtype)?);
        media.suffix = suffix.map(str::to_ascii_lowercase);

        while let Some(after) = rest.strip_prefix(';') {
            let param = after.trim_start();
            let eq = param
                .find(|c: char| c == '=' || c == ';')
                .filter(|&i| param.as_bytes()[i] == b'=')
                .ok_or_else(|| ParseMediaTypeError::MissingValue(param.trim().to_owned()))?;
            let name = token(&param[..eq])?;

            let (value, tail) = parameter_value(name, &param[eq + 1..])?;
            if media.parameters.insert(name.to_owned(), value).is_some() {
                return Err(ParseMediaTypeError::DuplicateParameter(name.to_owned()));
            }

            rest = tail.trim_start();
            if !rest.is_empty() && !rest.starts_with(';') {
                return Err(ParseMediaTypeError::InvalidToken(rest.to_owned()));
            }
        }

        Ok(media)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)?;
        if let Some(suffix) = &self.suffix {
            write!(f, "+{suffix}")?;
        }
        for (name, value) in &self.parameters {
            if !value.is_empty() && value.bytes().all(is_tchar) {
                write!(f, "; {name}={value}")?;
            } else {
                let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
                write!(f, "; {name}=\"{escaped}\"")?;
            }
        }
        Ok(())
    }
}

/// Splits one parameter value (token or quoted-string) off the front of `s`.
fn parameter_value<'a>(name: &str, s: &'a str) -> Result<(String, &'a str), ParseMediaTypeError> {
    let Some(quoted) = s.strip_prefix('"') else {
        let end = s.find(';').unwrap_or(s.len());
        let value = s[..end].trim_end();
        return Ok((token(value)?.to_owned(), &s[end..]));
    };

    let mut value = String::new();
    let mut chars = quoted.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((value, &quoted[i + 1..])),
            '\\' => match chars.next() {
                Some((_, escaped)) => value.push(escaped),
                None => break,
            },
            c => value.push(c),
        }
    }
    Err(ParseMediaTypeError::UnterminatedQuote(name.to_owned()))
}

fn token(s: &str) -> Result<&str, ParseMediaTypeError> {
    if !s.is_empty() && s.bytes().all(is_tchar) {
        Ok(s)
    } else {
        Err(ParseMediaTypeError::InvalidToken(s.to_owned()))
    }
}

// RFC 9110 §5.6.2
fn is_tchar(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_suffix() {
        let media: MediaType = "application/vnd.api+json".parse().unwrap();
        assert_eq!(media.type_, "application");
        assert_eq!(media.subtype, "vnd.api");
        assert_eq!(media.suffix.as_deref(), Some("json"));
        assert!(media.parameters.is_empty());
    }

    #[test]
    fn lowercases_type_keeps_parameter_case() {
        let media: MediaType = "Application/Vnd.API+JSON; Charset=UTF-8".parse().unwrap();
        assert_eq!(media.type_, "application");
        assert_eq!(media.subtype, "vnd.api");
        assert_eq!(media.suffix.as_deref(), Some("json"));
        assert_eq!(media.parameter("Charset"), Some("UTF-8"));
        assert_eq!(media.parameter("charset"), None);
    }

    #[test]
    fn parses_parameters_with_and_without_spaces() {
        let media: MediaType = "application/vnd.api+json;q=0.9".parse().unwrap();
        assert_eq!(media.parameter("q"), Some("0.9"));

        let media: MediaType = "text/html ; charset=utf-8 ;level=1".parse().unwrap();
        assert_eq!(media.parameter("charset"), Some("utf-8"));
        assert_eq!(media.parameter("level"), Some("1"));
    }

    #[test]
    fn parses_quoted_values() {
        let media: MediaType = r#"multipart/form-data; boundary="a \"b\"; c""#.parse().unwrap();
        assert_eq!(media.parameter("boundary"), Some(r#"a "b"; c"#));
    }

    #[test]
    fn no_suffix() {
        let media: MediaType = "application/json".parse().unwrap();
        assert_eq!(media.suffix, None);
        assert_eq!(media.subtype, "json");
    }

    #[test]
    fn rejects_malformed() {
        assert_eq!("".parse::<MediaType>(), Err(ParseMediaTypeError::Empty));
        assert_eq!("   ".parse::<MediaType>(), Err(ParseMediaTypeError::Empty));
        assert_eq!("json".parse::<MediaType>(), Err(ParseMediaTypeError::MissingSlash));
        assert!(matches!("application/".parse::<MediaType>(), Err(ParseMediaTypeError::InvalidToken(_))));
        assert!(matches!("application/vnd.api+".parse::<MediaType>(), Err(ParseMediaTypeError::InvalidToken(_))));
        assert!(matches!("a/b; charset".parse::<MediaType>(), Err(ParseMediaTypeError::MissingValue(_))));
        assert!(matches!("a/b; x=\"open".parse::<MediaType>(), Err(ParseMediaTypeError::UnterminatedQuote(_))));
        assert!(matches!("a/b; x=1; x=2".parse::<MediaType>(), Err(ParseMediaTypeError::DuplicateParameter(_))));
    }

    #[test]
    fn display_round_trips_essence() {
        let media: MediaType = "application/vnd.api+json; ext=\"a b\"".parse().unwrap();
        assert_eq!(media.to_string(), "application/vnd.api+json; ext=\"a b\"");
    }
}
