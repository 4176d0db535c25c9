//! Resource locators and their classification into routes.
//!
//! # Responsibility
//! - Parse and render `content://<authority>/<path>` locators.
//! - Classify a locator into a `RouteKind` without side effects.
//!
//! # Invariants
//! - Classification is pure and never fails; unknown shapes are `Unmatched`.

pub mod locator;
pub mod matcher;
