//! Inventory contract: authority, paths, table and column names.
//!
//! # Responsibility
//! - Own the names shared by the router, the storage engine and callers.
//! - Derive the locators and MIME types a provider instance exposes.
//!
//! # Invariants
//! - MIME types follow `vnd.android.cursor.{dir,item}/<authority>/<path>`.

use crate::routing::locator::{ResourceLocator, CONTENT_SCHEME};

/// Default authority under which the product collection is published.
pub const CONTENT_AUTHORITY: &str = "com.example.android.inventoryapp";
/// Default collection path segment.
pub const PATH_PRODUCTS: &str = "products";
/// Backing SQLite table.
pub const TABLE_PRODUCTS: &str = "products";

pub const COLUMN_ID: &str = "_id";
pub const COLUMN_NAME: &str = "name";
pub const COLUMN_PRICE: &str = "price";
pub const COLUMN_QUANTITY: &str = "quantity";
pub const COLUMN_SUPPLIER_NAME: &str = "supplier_name";
pub const COLUMN_SUPPLIER_PHONE: &str = "supplier_phone";

const DIR_BASE_TYPE: &str = "vnd.android.cursor.dir";
const ITEM_BASE_TYPE: &str = "vnd.android.cursor.item";

/// Static configuration of one provider instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Locator authority, e.g. `com.example.android.inventoryapp`.
    pub authority: String,
    /// Single path segment naming the collection.
    pub collection_path: String,
    /// Table the storage engine reads and writes.
    pub table: String,
    /// Integer primary-key column addressed by single-item locators.
    pub id_column: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            authority: CONTENT_AUTHORITY.to_string(),
            collection_path: PATH_PRODUCTS.to_string(),
            table: TABLE_PRODUCTS.to_string(),
            id_column: COLUMN_ID.to_string(),
        }
    }
}

impl ProviderConfig {
    /// Locator of the whole collection: `content://<authority>/<path>`.
    pub fn collection_locator(&self) -> ResourceLocator {
        ResourceLocator::new(
            CONTENT_SCHEME,
            self.authority.as_str(),
            [self.collection_path.as_str()],
        )
    }

    /// Locator of one item of the collection.
    pub fn item_locator(&self, id: i64) -> ResourceLocator {
        self.collection_locator().with_appended_id(id)
    }

    pub fn dir_mime_type(&self) -> String {
        format!(
            "{DIR_BASE_TYPE}/{}/{}",
            self.authority, self.collection_path
        )
    }

    pub fn item_mime_type(&self) -> String {
        format!(
            "{ITEM_BASE_TYPE}/{}/{}",
            self.authority, self.collection_path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::ProviderConfig;

    #[test]
    fn default_config_derives_locators_and_mime_types() {
        let config = ProviderConfig::default();
        assert_eq!(
            config.collection_locator().to_string(),
            "content://com.example.android.inventoryapp/products"
        );
        assert_eq!(
            config.item_locator(7).to_string(),
            "content://com.example.android.inventoryapp/products/7"
        );
        assert_eq!(
            config.dir_mime_type(),
            "vnd.android.cursor.dir/com.example.android.inventoryapp/products"
        );
        assert_eq!(
            config.item_mime_type(),
            "vnd.android.cursor.item/com.example.android.inventoryapp/products"
        );
    }
}
