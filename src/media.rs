//! Media type parsing, formatting, and compatibility.
//!
//! A [`MediaType`] is the `(type, subtype, parameters)` triple used for
//! content negotiation: the client advertises what it can decode through the
//! `Accept` header, and the server labels what it produced through
//! `Content-Type`.
//!
//! # Formats
//!
//! | Value | Meaning |
//! |-------|---------|
//! | `text/plain` | Concrete type |
//! | `text/plain; charset=utf-8` | Concrete type with parameter |
//! | `text/*` | Any text subtype |
//! | `*/*` | Anything |
//!
//! # Examples
//!
//! ```
//! use typed_rest::MediaType;
//!
//! let plain = MediaType::parse("text/plain; charset=utf-8").unwrap();
//! assert_eq!(plain.type_(), "text");
//! assert_eq!(plain.subtype(), "plain");
//! assert_eq!(plain.charset(), Some("utf-8"));
//!
//! let any_text = MediaType::parse("text/*").unwrap();
//! assert!(any_text.includes(&plain));
//! assert!(plain.is_compatible_with(&any_text));
//! ```

use std::fmt;
use std::str::FromStr;

/// A media type value with case-insensitive type and subtype.
///
/// Type and subtype are lowercased on construction so `Text/Plain` and
/// `text/plain` compare equal. Parameter names are lowercased as well;
/// parameter values are kept as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    type_: String,
    subtype: String,
    parameters: Vec<(String, String)>,
}

/// Error returned when a media type value cannot be parsed.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid media type '{value}': {reason}")]
pub struct InvalidMediaType {
    value: String,
    reason: &'static str,
}

impl InvalidMediaType {
    fn new(value: &str, reason: &'static str) -> Self {
        InvalidMediaType {
            value: value.to_string(),
            reason,
        }
    }
}

impl MediaType {
    /// Create a media type from type and subtype, no parameters.
    pub fn new(type_: &str, subtype: &str) -> Self {
        MediaType {
            type_: type_.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
            parameters: Vec::new(),
        }
    }

    /// Add a parameter, returning the modified media type.
    ///
    /// ```
    /// use typed_rest::MediaType;
    ///
    /// let mt = MediaType::new("text", "plain").with_parameter("charset", "utf-8");
    /// assert_eq!(mt.to_string(), "text/plain; charset=utf-8");
    /// ```
    pub fn with_parameter(mut self, name: &str, value: &str) -> Self {
        self.parameters
            .push((name.to_ascii_lowercase(), value.to_string()));
        self
    }

    /// `text/plain`
    pub fn text_plain() -> Self {
        MediaType::new("text", "plain")
    }

    /// `application/json`
    pub fn application_json() -> Self {
        MediaType::new("application", "json")
    }

    /// `application/octet-stream`
    pub fn octet_stream() -> Self {
        MediaType::new("application", "octet-stream")
    }

    /// `application/x-www-form-urlencoded`
    pub fn form_urlencoded() -> Self {
        MediaType::new("application", "x-www-form-urlencoded")
    }

    /// `*/*`
    pub fn all() -> Self {
        MediaType::new("*", "*")
    }

    /// Parse a media type value such as `text/plain; charset=utf-8`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMediaType`] when the slash is missing, type or
    /// subtype is empty, a parameter lacks `=`, or the type is a wildcard
    /// while the subtype is concrete (`*/plain` is not a valid range).
    pub fn parse(value: &str) -> Result<Self, InvalidMediaType> {
        let mut segments = value.split(';');
        let essence = segments
            .next()
            .map(str::trim)
            .unwrap_or_default();

        let (type_, subtype) = essence
            .split_once('/')
            .ok_or_else(|| InvalidMediaType::new(value, "missing '/'"))?;
        let type_ = type_.trim();
        let subtype = subtype.trim();
        if type_.is_empty() || subtype.is_empty() {
            return Err(InvalidMediaType::new(value, "empty type or subtype"));
        }
        if type_.contains(char::is_whitespace) || subtype.contains(char::is_whitespace) {
            return Err(InvalidMediaType::new(value, "whitespace inside token"));
        }
        if type_ == "*" && subtype != "*" {
            return Err(InvalidMediaType::new(
                value,
                "wildcard type with concrete subtype",
            ));
        }

        let mut media_type = MediaType::new(type_, subtype);
        for segment in segments {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let (name, raw) = segment
                .split_once('=')
                .ok_or_else(|| InvalidMediaType::new(value, "parameter without '='"))?;
            let unquoted = raw.trim().trim_matches('"');
            media_type = media_type.with_parameter(name.trim(), unquoted);
        }
        Ok(media_type)
    }

    /// The primary type, e.g. `text` in `text/plain`.
    pub fn type_(&self) -> &str {
        &self.type_
    }

    /// The subtype, e.g. `plain` in `text/plain`.
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// Look up a parameter value by (case-insensitive) name.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.parameters
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// The `charset` parameter, if present.
    pub fn charset(&self) -> Option<&str> {
        self.parameter("charset")
    }

    /// Whether the primary type is `*`.
    pub fn is_wildcard_type(&self) -> bool {
        self.type_ == "*"
    }

    /// Whether the subtype is `*`.
    pub fn is_wildcard_subtype(&self) -> bool {
        self.subtype == "*"
    }

    /// Whether neither type nor subtype is a wildcard.
    pub fn is_concrete(&self) -> bool {
        !self.is_wildcard_type() && !self.is_wildcard_subtype()
    }

    /// Whether this media type's range covers `other`.
    ///
    /// `*/*` includes everything; `text/*` includes any `text` subtype;
    /// a concrete type includes only an equal one. Parameters are ignored.
    pub fn includes(&self, other: &MediaType) -> bool {
        if self.is_wildcard_type() {
            return true;
        }
        self.type_ == other.type_
            && (self.is_wildcard_subtype() || self.subtype == other.subtype)
    }

    /// Symmetric compatibility: true when either side's range covers the
    /// other. `text/plain` is compatible with `text/*` in both directions.
    pub fn is_compatible_with(&self, other: &MediaType) -> bool {
        self.includes(other) || other.includes(self)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)?;
        for (name, value) in &self.parameters {
            write!(f, "; {}={}", name, value)?;
        }
        Ok(())
    }
}

impl FromStr for MediaType {
    type Err = InvalidMediaType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaType::parse(s)
    }
}

/// Format a list of media types as an `Accept` header value.
///
/// ```
/// use typed_rest::MediaType;
/// use typed_rest::media::format_accept;
///
/// let value = format_accept(&[MediaType::text_plain(), MediaType::application_json()]);
/// assert_eq!(value, "text/plain, application/json");
/// ```
pub fn format_accept(media_types: &[MediaType]) -> String {
    media_types
        .iter()
        .map(|mt| mt.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple() {
        let mt = MediaType::parse("text/plain").unwrap();
        assert_eq!(mt.type_(), "text");
        assert_eq!(mt.subtype(), "plain");
        assert!(mt.is_concrete());
    }

    #[test]
    fn parse_is_case_insensitive() {
        let upper = MediaType::parse("Text/Plain").unwrap();
        assert_eq!(upper, MediaType::text_plain());
    }

    #[test]
    fn parse_with_parameters() {
        let mt = MediaType::parse("text/plain; charset=utf-8; format=flowed").unwrap();
        assert_eq!(mt.charset(), Some("utf-8"));
        assert_eq!(mt.parameter("format"), Some("flowed"));
        assert_eq!(mt.parameter("missing"), None);
    }

    #[test]
    fn parse_quoted_parameter() {
        let mt = MediaType::parse(r#"text/plain; charset="utf-8""#).unwrap();
        assert_eq!(mt.charset(), Some("utf-8"));
    }

    #[test]
    fn parse_rejects_missing_slash() {
        assert!(MediaType::parse("textplain").is_err());
    }

    #[test]
    fn parse_rejects_empty_subtype() {
        assert!(MediaType::parse("text/").is_err());
    }

    #[test]
    fn parse_rejects_wildcard_type_concrete_subtype() {
        assert!(MediaType::parse("*/plain").is_err());
    }

    #[test]
    fn wildcard_inclusion() {
        let all = MediaType::all();
        let any_text = MediaType::parse("text/*").unwrap();
        let plain = MediaType::text_plain();
        let json = MediaType::application_json();

        assert!(all.includes(&plain));
        assert!(all.includes(&json));
        assert!(any_text.includes(&plain));
        assert!(!any_text.includes(&json));
        assert!(!plain.includes(&any_text));
    }

    #[test]
    fn compatibility_is_symmetric() {
        let any_text = MediaType::parse("text/*").unwrap();
        let plain = MediaType::text_plain();
        assert!(plain.is_compatible_with(&any_text));
        assert!(any_text.is_compatible_with(&plain));
        assert!(!plain.is_compatible_with(&MediaType::application_json()));
    }

    #[test]
    fn inclusion_ignores_parameters() {
        let with_charset = MediaType::text_plain().with_parameter("charset", "utf-8");
        assert!(MediaType::text_plain().includes(&with_charset));
    }

    #[test]
    fn display_round_trips() {
        let mt = MediaType::parse("application/json; charset=utf-8").unwrap();
        assert_eq!(mt.to_string(), "application/json; charset=utf-8");
        assert_eq!(MediaType::parse(&mt.to_string()).unwrap(), mt);
    }

    #[test]
    fn accept_header_formatting() {
        assert_eq!(format_accept(&[]), "");
        assert_eq!(
            format_accept(&[MediaType::text_plain(), MediaType::octet_stream()]),
            "text/plain, application/octet-stream"
        );
    }
}
