//! Typed domain model over the product table.
//!
//! # Invariants
//! - Model validation lives here and in the service layer; the router passes
//!   records through untouched.

pub mod product;
