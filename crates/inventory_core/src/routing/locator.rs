//! Structured resource locator.
//!
//! # Invariants
//! - Path segments are never empty; `//` and trailing `/` collapse on parse.
//! - `Display` output parses back to an equal locator.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Scheme used by every locator the provider publishes.
pub const CONTENT_SCHEME: &str = "content";

static LOCATOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<scheme>[A-Za-z][A-Za-z0-9+.\-]*)://(?P<authority>[^/?#]+)(?P<path>[^?#]*)$")
        .expect("valid locator regex")
});

/// Error returned when a string is not a `scheme://authority[/path]` locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorParseError {
    input: String,
}

impl LocatorParseError {
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl Display for LocatorParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "malformed resource locator `{}`; expected scheme://authority[/path]",
            self.input
        )
    }
}

impl Error for LocatorParseError {}

/// Address of a collection or of one item inside it.
///
/// Used both as routing input and as the key of change notifications.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceLocator {
    scheme: String,
    authority: String,
    segments: Vec<String>,
}

impl ResourceLocator {
    /// Builds a locator from already-split parts. Empty segments are dropped.
    pub fn new<S>(
        scheme: impl Into<String>,
        authority: impl Into<String>,
        segments: impl IntoIterator<Item = S>,
    ) -> Self
    where
        S: Into<String>,
    {
        Self {
            scheme: scheme.into(),
            authority: authority.into(),
            segments: segments
                .into_iter()
                .map(Into::<String>::into)
                .filter(|segment: &String| !segment.is_empty())
                .collect(),
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the numeric id carried by the last path segment, if any.
    ///
    /// This is the row-identification convention for single-item locators.
    pub fn parse_id(&self) -> Option<i64> {
        let last = self.segments.last()?;
        if last.is_empty() || !last.bytes().all(|byte| byte.is_ascii_digit()) {
            return None;
        }
        last.parse().ok()
    }

    /// Returns a child locator with `id` appended as the last segment.
    pub fn with_appended_id(&self, id: i64) -> Self {
        let mut child = self.clone();
        child.segments.push(id.to_string());
        child
    }

    /// Whether `other` lives strictly below this locator.
    pub fn is_ancestor_of(&self, other: &ResourceLocator) -> bool {
        self.scheme == other.scheme
            && self.authority == other.authority
            && other.segments.len() > self.segments.len()
            && other.segments.starts_with(&self.segments)
    }
}

impl Display for ResourceLocator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}", self.scheme, self.authority)?;
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for ResourceLocator {
    type Err = LocatorParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let captures = LOCATOR_RE.captures(trimmed).ok_or_else(|| LocatorParseError {
            input: trimmed.to_string(),
        })?;

        let path = captures.name("path").map_or("", |path| path.as_str());
        Ok(Self::new(
            &captures["scheme"],
            &captures["authority"],
            path.split('/'),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::ResourceLocator;

    #[test]
    fn parse_collapses_empty_segments_and_renders_back() {
        let locator: ResourceLocator = "content://shop/products//7/".parse().unwrap();
        assert_eq!(locator.authority(), "shop");
        assert_eq!(locator.segments(), ["products", "7"]);
        assert_eq!(locator.to_string(), "content://shop/products/7");
    }

    #[test]
    fn parse_rejects_missing_scheme_authority_or_query() {
        for input in ["products/7", "content:///products", "content://shop/products?x=1", ""] {
            let err = input
                .parse::<ResourceLocator>()
                .expect_err("malformed input must be rejected");
            assert_eq!(err.input(), input.trim());
        }
    }

    #[test]
    fn parse_id_reads_numeric_last_segment_only() {
        let item: ResourceLocator = "content://shop/products/42".parse().unwrap();
        assert_eq!(item.parse_id(), Some(42));

        let named: ResourceLocator = "content://shop/products/abc".parse().unwrap();
        assert_eq!(named.parse_id(), None);

        let signed: ResourceLocator = "content://shop/products/-3".parse().unwrap();
        assert_eq!(signed.parse_id(), None);

        let bare: ResourceLocator = "content://shop".parse().unwrap();
        assert_eq!(bare.parse_id(), None);
    }

    #[test]
    fn ancestor_check_requires_same_authority_and_prefix() {
        let collection: ResourceLocator = "content://shop/products".parse().unwrap();
        let item = collection.with_appended_id(3);
        let other: ResourceLocator = "content://other/products/3".parse().unwrap();

        assert!(collection.is_ancestor_of(&item));
        assert!(!item.is_ancestor_of(&collection));
        assert!(!collection.is_ancestor_of(&collection));
        assert!(!collection.is_ancestor_of(&other));
    }
}
