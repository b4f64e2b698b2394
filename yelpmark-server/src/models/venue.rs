//! External directory identifier validation
//!
//! Yelp business ids are slugs (`gary-danko-san-francisco`, possibly with
//! non-ASCII letters) or URL-safe base64 tokens. Only characters that would
//! change the shape of a URL path are refused. The directory client
//! percent-encodes whatever is left.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

static EXTERNAL_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^/?#\s\p{Cc}]{1,128}$").expect("invalid external id regex"));

/// Validated external directory id ("yelp_id")
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalId(String);

impl ExternalId {
    /// Create a new external id, validating its format.
    ///
    /// # Example
    /// ```
    /// use yelpmark_server::models::ExternalId;
    ///
    /// assert!(ExternalId::new("gary-danko-san-francisco").is_ok());
    /// assert!(ExternalId::new("WavvLdfdP6g8aZTtbBQHTw").is_ok());
    /// assert!(ExternalId::new("café-de-flore-paris").is_ok());
    /// assert!(ExternalId::new("../admin").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "yelp_id" });
        }

        if s == "." || s == ".." || !EXTERNAL_ID_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "yelp_id",
                reason: "must be 1-128 characters with no '/', '?', '#', whitespace or control characters",
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ExternalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ids() {
        assert!(ExternalId::new("abc").is_ok());
        assert!(ExternalId::new("the-slanted-door-san-francisco-2").is_ok());
        assert!(ExternalId::new("x_Y-9").is_ok());
    }

    #[test]
    fn rejects_empty() {
        let err = ExternalId::new("").unwrap_err();
        assert!(matches!(err, ValidationError::Empty { .. }));
    }

    #[test]
    fn accepts_unicode_aliases() {
        for alias in ["café-de-flore-paris", "läderach-zürich", "すし-tokyo"] {
            assert_eq!(ExternalId::new(alias).unwrap().as_str(), alias);
        }
    }

    #[test]
    fn rejects_path_characters() {
        for bad in ["a/b", "a b", "a?b=c", "a#frag", "tab\there", "nul\u{0}", ".", ".."] {
            let err = ExternalId::new(bad).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidFormat { .. }), "{bad}");
        }
    }

    #[test]
    fn rejects_overlong() {
        assert!(ExternalId::new(&"a".repeat(128)).is_ok());
        assert!(ExternalId::new(&"a".repeat(129)).is_err());
        // counted in characters, not bytes
        assert!(ExternalId::new(&"é".repeat(128)).is_ok());
    }
}
