//! CRUD router over one table.
//!
//! # Responsibility
//! - Classify each call's locator and translate it into one storage call.
//! - Force the id filter for single-item locators.
//! - Publish change notifications after mutations.
//!
//! # Invariants
//! - Routing failures never reach the storage engine.
//! - Storage faults are returned unchanged; the router never retries.

mod cursor;
mod inventory_provider;

pub use cursor::Cursor;
pub use inventory_provider::InventoryProvider;

use crate::routing::locator::ResourceLocator;
use crate::storage::StorageError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Router entry point that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Query,
    GetType,
    Insert,
    Update,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::GetType => "get_type",
            Self::Insert => "insert",
            Self::Update => "update",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum ProviderError {
    /// The locator does not address this provider's collection or an item of
    /// it (or, for insert, addresses an item instead of the collection).
    Routing {
        operation: Operation,
        locator: ResourceLocator,
    },
    /// The storage engine created no row.
    Insert { locator: ResourceLocator },
    Storage(StorageError),
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Routing { operation, locator } => {
                write!(f, "{operation} is not supported for locator `{locator}`")
            }
            Self::Insert { locator } => write!(f, "failed to insert row for `{locator}`"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProviderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Routing { .. } | Self::Insert { .. } => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<StorageError> for ProviderError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}
