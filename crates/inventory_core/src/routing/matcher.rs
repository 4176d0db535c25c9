//! Locator classification.
//!
//! # Responsibility
//! - Hold the immutable rule set of one provider: the bare collection path
//!   and the collection path followed by a numeric id.
//! - Map a locator to a `RouteKind`.
//!
//! # Invariants
//! - `classify` is pure; the rule set never changes after construction.
//! - A numeric segment is one or more ASCII digits that fit in `i64`.

use crate::contract::ProviderConfig;
use crate::routing::locator::{ResourceLocator, CONTENT_SCHEME};

/// Classification result for one locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// The whole collection.
    Collection,
    /// One row of the collection, addressed by id.
    SingleItem(i64),
    /// Any other shape.
    Unmatched,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternSegment {
    Literal(String),
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RouteCode {
    Collection,
    SingleItem,
}

#[derive(Debug, Clone)]
struct MatchRule {
    pattern: Vec<PatternSegment>,
    code: RouteCode,
}

/// Immutable rule table for one authority and collection.
#[derive(Debug, Clone)]
pub struct ResourceMatcher {
    authority: String,
    rules: Vec<MatchRule>,
}

impl ResourceMatcher {
    /// Builds the two rules of a collection: `<path>` and `<path>/#`.
    pub fn new(authority: impl Into<String>, collection_path: impl Into<String>) -> Self {
        let collection_path = collection_path.into();
        Self {
            authority: authority.into(),
            rules: vec![
                MatchRule {
                    pattern: vec![
                        PatternSegment::Literal(collection_path.clone()),
                        PatternSegment::Number,
                    ],
                    code: RouteCode::SingleItem,
                },
                MatchRule {
                    pattern: vec![PatternSegment::Literal(collection_path)],
                    code: RouteCode::Collection,
                },
            ],
        }
    }

    pub fn for_config(config: &ProviderConfig) -> Self {
        Self::new(config.authority.as_str(), config.collection_path.as_str())
    }

    /// Classifies `locator` against the registered rules.
    pub fn classify(&self, locator: &ResourceLocator) -> RouteKind {
        if locator.scheme() != CONTENT_SCHEME || locator.authority() != self.authority {
            return RouteKind::Unmatched;
        }

        self.rules
            .iter()
            .find(|rule| rule_matches(rule, locator.segments()))
            .map_or(RouteKind::Unmatched, |rule| match rule.code {
                RouteCode::Collection => RouteKind::Collection,
                RouteCode::SingleItem => locator
                    .parse_id()
                    .map_or(RouteKind::Unmatched, RouteKind::SingleItem),
            })
    }
}

fn rule_matches(rule: &MatchRule, segments: &[String]) -> bool {
    rule.pattern.len() == segments.len()
        && rule
            .pattern
            .iter()
            .zip(segments)
            .all(|(pattern, segment)| match pattern {
                PatternSegment::Literal(expected) => expected == segment,
                PatternSegment::Number => is_row_id(segment),
            })
}

fn is_row_id(segment: &str) -> bool {
    !segment.is_empty()
        && segment.bytes().all(|byte| byte.is_ascii_digit())
        && segment.parse::<i64>().is_ok()
}
