//! Locator-routed data access for the inventory product table.
//!
//! Callers address the collection (`content://<authority>/products`) or one
//! product (`.../products/<id>`); the provider classifies the locator, runs
//! the matching storage call and publishes change notifications.

pub mod contract;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod provider;
pub mod routing;
pub mod service;
pub mod storage;

pub use contract::ProviderConfig;
pub use logging::{default_log_level, init_logging, logging_status, LogConfig};
pub use model::product::{Product, ProductId, ProductValidationError};
pub use notify::{ChangeNotifier, ContentObserver, ObserverId, ObserverRegistry};
pub use provider::{Cursor, InventoryProvider, Operation, ProviderError, ProviderResult};
pub use routing::locator::{LocatorParseError, ResourceLocator};
pub use routing::matcher::{ResourceMatcher, RouteKind};
pub use service::inventory_service::{InventoryService, ServiceError, ServiceResult};
pub use storage::sqlite_engine::SqliteStorageEngine;
pub use storage::{FieldValue, Record, Selection, StorageEngine, StorageError, StorageResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
