//! Storage engine boundary.
//!
//! # Responsibility
//! - Define the four row-level primitives the router needs from its
//!   collaborator: query, insert, update and delete over one table.
//! - Provide the SQLite-backed engine used in production and tests.
//!
//! # Invariants
//! - Selections and sort orders are passed through verbatim; the engine does
//!   not validate them.
//! - A failed insert is reported as `Ok(None)`, not as an error.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod record;
pub mod sqlite_engine;

pub use record::{FieldValue, Record};

pub type StorageResult<T> = Result<T, StorageError>;

/// Faults surfaced by a storage engine while executing a primitive.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// Update was called with a record that carries no columns.
    EmptyValues { table: String },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::EmptyValues { table } => {
                write!(f, "refusing to update `{table}` with an empty record")
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::EmptyValues { .. } => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Row filter: an optional predicate with `?` placeholders plus its
/// positional arguments.
///
/// `clause = None` selects every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub clause: Option<String>,
    pub args: Vec<FieldValue>,
}

impl Selection {
    /// Selects every row.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new<A>(clause: impl Into<String>, args: impl IntoIterator<Item = A>) -> Self
    where
        A: Into<FieldValue>,
    {
        Self {
            clause: Some(clause.into()),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Targets exactly the row whose `column` equals `id`.
    pub fn by_id(column: &str, id: i64) -> Self {
        Self {
            clause: Some(format!("{column}=?")),
            args: vec![FieldValue::Integer(id)],
        }
    }
}

/// Row-level primitives over a single table.
pub trait StorageEngine {
    /// Returns every row matching `selection`, in `sort_order` when given.
    ///
    /// `projection = None` returns all columns in table order.
    fn query_rows(
        &self,
        table: &str,
        projection: Option<&[&str]>,
        selection: &Selection,
        sort_order: Option<&str>,
    ) -> StorageResult<Vec<Record>>;

    /// Inserts one row and returns its id, or `None` when no row was created.
    fn insert_row(&self, table: &str, record: &Record) -> StorageResult<Option<i64>>;

    /// Updates matching rows and returns how many changed.
    fn update_rows(&self, table: &str, record: &Record, selection: &Selection)
        -> StorageResult<usize>;

    /// Deletes matching rows and returns how many were removed.
    fn delete_rows(&self, table: &str, selection: &Selection) -> StorageResult<usize>;
}

impl<E: StorageEngine + ?Sized> StorageEngine for &E {
    fn query_rows(
        &self,
        table: &str,
        projection: Option<&[&str]>,
        selection: &Selection,
        sort_order: Option<&str>,
    ) -> StorageResult<Vec<Record>> {
        (**self).query_rows(table, projection, selection, sort_order)
    }

    fn insert_row(&self, table: &str, record: &Record) -> StorageResult<Option<i64>> {
        (**self).insert_row(table, record)
    }

    fn update_rows(
        &self,
        table: &str,
        record: &Record,
        selection: &Selection,
    ) -> StorageResult<usize> {
        (**self).update_rows(table, record, selection)
    }

    fn delete_rows(&self, table: &str, selection: &Selection) -> StorageResult<usize> {
        (**self).delete_rows(table, selection)
    }
}
