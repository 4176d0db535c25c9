//! Product use-case service.
//!
//! # Responsibility
//! - Provide typed product CRUD and stock movements for core callers.
//! - Validate products before they reach the router.
//!
//! # Invariants
//! - Every storage access goes through `InventoryProvider`, so change
//!   notifications fire exactly as for raw locator calls.
//! - Stock never drops below zero through this service.

use crate::contract::{COLUMN_ID, COLUMN_QUANTITY};
use crate::model::product::{Product, ProductId, ProductValidationError};
use crate::notify::ChangeNotifier;
use crate::provider::{InventoryProvider, ProviderError};
use crate::storage::{Record, Selection, StorageEngine};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    Validation(ProductValidationError),
    Provider(ProviderError),
    NotFound(ProductId),
    /// Update was requested for a product that was never persisted.
    MissingId,
    /// Stock movements must be strictly positive and must not overflow.
    InvalidAmount(i64),
    InsufficientStock {
        id: ProductId,
        available: i64,
        requested: i64,
    },
    InconsistentState(&'static str),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Provider(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "product not found: {id}"),
            Self::MissingId => write!(f, "product has no id; insert it first"),
            Self::InvalidAmount(amount) => write!(f, "invalid stock amount: {amount}"),
            Self::InsufficientStock {
                id,
                available,
                requested,
            } => write!(
                f,
                "product {id} has {available} in stock; cannot remove {requested}"
            ),
            Self::InconsistentState(details) => write!(f, "inconsistent product state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Provider(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ProductValidationError> for ServiceError {
    fn from(value: ProductValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ProviderError> for ServiceError {
    fn from(value: ProviderError) -> Self {
        Self::Provider(value)
    }
}

/// Typed product API over a locator-routed provider.
pub struct InventoryService<E, N> {
    provider: InventoryProvider<E, N>,
}

impl<E: StorageEngine, N: ChangeNotifier> InventoryService<E, N> {
    pub fn new(provider: InventoryProvider<E, N>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &InventoryProvider<E, N> {
        &self.provider
    }

    /// Validates and inserts `product`, returning the assigned id.
    ///
    /// `product.id` is ignored.
    pub fn add_product(&self, product: &Product) -> ServiceResult<ProductId> {
        product.validate()?;
        let created = self
            .provider
            .insert(&self.provider.collection_locator(), &product.to_record())?;
        created
            .parse_id()
            .ok_or(ServiceError::InconsistentState("insert returned a locator without id"))
    }

    /// Negative ids address no row and yield `Ok(None)`.
    pub fn get_product(&self, id: ProductId) -> ServiceResult<Option<Product>> {
        if id < 0 {
            return Ok(None);
        }
        let cursor = self.provider.query(
            &self.provider.config().item_locator(id),
            None,
            &Selection::all(),
            None,
        )?;
        Ok(cursor.first().map(Product::from_record).transpose()?)
    }

    /// Lists all products; `sort_order` defaults to ascending id.
    pub fn list_products(&self, sort_order: Option<&str>) -> ServiceResult<Vec<Product>> {
        let default_order = format!("{COLUMN_ID} ASC");
        let cursor = self.provider.query(
            &self.provider.collection_locator(),
            None,
            &Selection::all(),
            Some(sort_order.unwrap_or(default_order.as_str())),
        )?;
        cursor
            .iter()
            .map(|record| Product::from_record(record).map_err(ServiceError::from))
            .collect()
    }

    /// Replaces every writable column of an existing product.
    pub fn update_product(&self, product: &Product) -> ServiceResult<()> {
        let id = product.id.ok_or(ServiceError::MissingId)?;
        product.validate()?;
        self.update_record(id, &product.to_record())
    }

    /// Removes `amount` units from stock and returns the updated product.
    pub fn record_sale(&self, id: ProductId, amount: i64) -> ServiceResult<Product> {
        if amount <= 0 {
            return Err(ServiceError::InvalidAmount(amount));
        }
        let mut product = self.get_product(id)?.ok_or(ServiceError::NotFound(id))?;
        if product.quantity < amount {
            return Err(ServiceError::InsufficientStock {
                id,
                available: product.quantity,
                requested: amount,
            });
        }

        product.quantity -= amount;
        self.update_record(id, &Record::new().with(COLUMN_QUANTITY, product.quantity))?;
        Ok(product)
    }

    /// Adds `amount` units to stock and returns the updated product.
    pub fn receive_stock(&self, id: ProductId, amount: i64) -> ServiceResult<Product> {
        if amount <= 0 {
            return Err(ServiceError::InvalidAmount(amount));
        }
        let mut product = self.get_product(id)?.ok_or(ServiceError::NotFound(id))?;
        product.quantity = product
            .quantity
            .checked_add(amount)
            .ok_or(ServiceError::InvalidAmount(amount))?;

        self.update_record(id, &Record::new().with(COLUMN_QUANTITY, product.quantity))?;
        Ok(product)
    }

    pub fn delete_product(&self, id: ProductId) -> ServiceResult<()> {
        let deleted = self
            .provider
            .delete(&self.provider.config().item_locator(id), &Selection::all())?;
        if deleted == 0 {
            return Err(ServiceError::NotFound(id));
        }
        Ok(())
    }

    /// Deletes every product and returns how many were removed.
    pub fn delete_all(&self) -> ServiceResult<usize> {
        Ok(self
            .provider
            .delete(&self.provider.collection_locator(), &Selection::all())?)
    }

    fn update_record(&self, id: ProductId, record: &Record) -> ServiceResult<()> {
        if id < 0 {
            return Err(ServiceError::NotFound(id));
        }
        let changed = self.provider.update(
            &self.provider.config().item_locator(id),
            record,
            &Selection::all(),
        )?;
        if changed == 0 {
            return Err(ServiceError::NotFound(id));
        }
        Ok(())
    }
}
