//! Collection name validation

use super::ValidationError;

/// Maximum length for collection names
const MAX_NAME_LEN: usize = 255;

/// Validated collection name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionName(String);

impl CollectionName {
    /// Create a new collection name.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 255 characters
    ///
    /// # Example
    /// ```
    /// use yelpmark_server::models::CollectionName;
    ///
    /// assert!(CollectionName::new("Date night").is_ok());
    /// assert!(CollectionName::new("").is_err());
    /// assert!(CollectionName::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty {
                field: "collection name",
            });
        }

        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "collection name",
                max: MAX_NAME_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
