//! Product domain model.
//!
//! # Responsibility
//! - Typed view over one row of the product table.
//! - Convert between `Product` and storage `Record`s.
//!
//! # Invariants
//! - `name` is non-blank after trimming.
//! - `price` and `quantity` are never negative.
//! - `id` is assigned by storage and never written by `to_record`.

use crate::contract::{
    COLUMN_ID, COLUMN_NAME, COLUMN_PRICE, COLUMN_QUANTITY, COLUMN_SUPPLIER_NAME,
    COLUMN_SUPPLIER_PHONE,
};
use crate::storage::{FieldValue, Record};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Row id assigned by the storage engine.
pub type ProductId = i64;

/// Validation and decode failures for product data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductValidationError {
    EmptyName,
    NegativePrice(i64),
    NegativeQuantity(i64),
    /// A stored row lacks a required column or holds the wrong type.
    InvalidColumn {
        column: &'static str,
        message: String,
    },
}

impl Display for ProductValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "product name cannot be empty"),
            Self::NegativePrice(value) => write!(f, "product price cannot be negative: {value}"),
            Self::NegativeQuantity(value) => {
                write!(f, "product quantity cannot be negative: {value}")
            }
            Self::InvalidColumn { column, message } => {
                write!(f, "invalid product column `{column}`: {message}")
            }
        }
    }
}

impl Error for ProductValidationError {}

/// One product row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// `None` until the row is persisted.
    pub id: Option<ProductId>,
    pub name: String,
    /// Unit price in minor currency units.
    pub price: i64,
    pub quantity: i64,
    pub supplier_name: Option<String>,
    pub supplier_phone: Option<String>,
}

impl Product {
    /// Creates an unsaved product without supplier details.
    pub fn new(name: impl Into<String>, price: i64, quantity: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            price,
            quantity,
            supplier_name: None,
            supplier_phone: None,
        }
    }

    pub fn with_supplier(
        mut self,
        supplier_name: impl Into<String>,
        supplier_phone: impl Into<String>,
    ) -> Self {
        self.supplier_name = Some(supplier_name.into());
        self.supplier_phone = Some(supplier_phone.into());
        self
    }

    pub fn validate(&self) -> Result<(), ProductValidationError> {
        if self.name.trim().is_empty() {
            return Err(ProductValidationError::EmptyName);
        }
        if self.price < 0 {
            return Err(ProductValidationError::NegativePrice(self.price));
        }
        if self.quantity < 0 {
            return Err(ProductValidationError::NegativeQuantity(self.quantity));
        }
        Ok(())
    }

    /// Writable columns in table order. `id` is never included.
    pub fn to_record(&self) -> Record {
        Record::new()
            .with(COLUMN_NAME, self.name.as_str())
            .with(COLUMN_PRICE, self.price)
            .with(COLUMN_QUANTITY, self.quantity)
            .with(COLUMN_SUPPLIER_NAME, self.supplier_name.clone())
            .with(COLUMN_SUPPLIER_PHONE, self.supplier_phone.clone())
    }

    /// Decodes a full-projection row and validates it.
    ///
    /// Rejects persisted state that violates model invariants instead of
    /// masking it.
    pub fn from_record(record: &Record) -> Result<Self, ProductValidationError> {
        let product = Self {
            id: Some(required_i64(record, COLUMN_ID)?),
            name: required_text(record, COLUMN_NAME)?,
            price: required_i64(record, COLUMN_PRICE)?,
            quantity: required_i64(record, COLUMN_QUANTITY)?,
            supplier_name: optional_text(record, COLUMN_SUPPLIER_NAME)?,
            supplier_phone: optional_text(record, COLUMN_SUPPLIER_PHONE)?,
        };
        product.validate()?;
        Ok(product)
    }
}

fn required_i64(record: &Record, column: &'static str) -> Result<i64, ProductValidationError> {
    match record.get(column) {
        Some(FieldValue::Integer(value)) => Ok(*value),
        Some(other) => Err(invalid(column, format!("expected integer, got `{other}`"))),
        None => Err(invalid(column, "missing".to_string())),
    }
}

fn required_text(record: &Record, column: &'static str) -> Result<String, ProductValidationError> {
    optional_text(record, column)?.ok_or_else(|| invalid(column, "missing".to_string()))
}

fn optional_text(
    record: &Record,
    column: &'static str,
) -> Result<Option<String>, ProductValidationError> {
    match record.get(column) {
        None | Some(FieldValue::Null) => Ok(None),
        Some(FieldValue::Text(value)) => Ok(Some(value.clone())),
        Some(other) => Err(invalid(column, format!("expected text, got `{other}`"))),
    }
}

fn invalid(column: &'static str, message: String) -> ProductValidationError {
    ProductValidationError::InvalidColumn { column, message }
}
