//! SQLite implementation of the storage engine boundary.
//!
//! # Responsibility
//! - Translate the four primitives into parameterized SQL.
//! - Convert between `FieldValue` and SQLite values.
//!
//! # Invariants
//! - Table and written column names are quoted as identifiers; projection,
//!   selection and sort order are spliced verbatim.
//! - Values and selection arguments are always bound, never formatted into SQL.
//! - Constraint violations on insert become `Ok(None)`; every other fault is
//!   returned unchanged.

use crate::storage::{FieldValue, Record, Selection, StorageEngine, StorageError, StorageResult};
use log::{debug, warn};
use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{params_from_iter, Connection, ErrorCode, ToSql};

/// Storage engine over a borrowed, already-migrated connection.
///
/// Locking and transactional guarantees are SQLite's own.
pub struct SqliteStorageEngine<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStorageEngine<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl StorageEngine for SqliteStorageEngine<'_> {
    fn query_rows(
        &self,
        table: &str,
        projection: Option<&[&str]>,
        selection: &Selection,
        sort_order: Option<&str>,
    ) -> StorageResult<Vec<Record>> {
        let columns = match projection {
            Some(columns) if !columns.is_empty() => columns.join(", "),
            _ => "*".to_string(),
        };
        let mut sql = format!("SELECT {columns} FROM {}", quote_identifier(table));
        push_where(&mut sql, selection);
        if let Some(order) = sort_order.filter(|order| !order.trim().is_empty()) {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let mut rows = stmt.query(params_from_iter(selection.args.iter()))?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            let mut record = Record::with_capacity(names.len());
            for (index, name) in names.iter().enumerate() {
                record.put(name.as_str(), FieldValue::try_from(row.get_ref(index)?)?);
            }
            records.push(record);
        }

        debug!(
            "event=storage_query module=storage status=ok table={table} rows={}",
            records.len()
        );
        Ok(records)
    }

    fn insert_row(&self, table: &str, record: &Record) -> StorageResult<Option<i64>> {
        let sql = if record.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", quote_identifier(table))
        } else {
            let columns = record
                .columns()
                .map(quote_identifier)
                .collect::<Vec<_>>()
                .join(", ");
            let placeholders = vec!["?"; record.len()].join(", ");
            format!(
                "INSERT INTO {} ({columns}) VALUES ({placeholders})",
                quote_identifier(table)
            )
        };

        match self.conn.execute(&sql, params_from_iter(record.values())) {
            Ok(_) => {
                let row_id = self.conn.last_insert_rowid();
                debug!("event=storage_insert module=storage status=ok table={table} row_id={row_id}");
                Ok(Some(row_id))
            }
            Err(rusqlite::Error::SqliteFailure(failure, message))
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                warn!(
                    "event=storage_insert module=storage status=error table={table} error_code=constraint_violation error={}",
                    message.as_deref().unwrap_or("constraint failed")
                );
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn update_rows(
        &self,
        table: &str,
        record: &Record,
        selection: &Selection,
    ) -> StorageResult<usize> {
        if record.is_empty() {
            return Err(StorageError::EmptyValues {
                table: table.to_string(),
            });
        }

        let assignments = record
            .columns()
            .map(|column| format!("{} = ?", quote_identifier(column)))
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("UPDATE {} SET {assignments}", quote_identifier(table));
        push_where(&mut sql, selection);

        let changed = self.conn.execute(
            &sql,
            params_from_iter(record.values().chain(selection.args.iter())),
        )?;
        debug!("event=storage_update module=storage status=ok table={table} rows={changed}");
        Ok(changed)
    }

    fn delete_rows(&self, table: &str, selection: &Selection) -> StorageResult<usize> {
        let mut sql = format!("DELETE FROM {}", quote_identifier(table));
        push_where(&mut sql, selection);

        let changed = self
            .conn
            .execute(&sql, params_from_iter(selection.args.iter()))?;
        debug!("event=storage_delete module=storage status=ok table={table} rows={changed}");
        Ok(changed)
    }
}

impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Borrowed(match self {
            Self::Null => ValueRef::Null,
            Self::Integer(value) => ValueRef::Integer(*value),
            Self::Real(value) => ValueRef::Real(*value),
            Self::Text(value) => ValueRef::Text(value.as_bytes()),
            Self::Blob(value) => ValueRef::Blob(value.as_slice()),
        }))
    }
}

/// TEXT cells must be valid UTF-8; anything else is a storage fault.
impl TryFrom<ValueRef<'_>> for FieldValue {
    type Error = rusqlite::Error;

    fn try_from(value: ValueRef<'_>) -> Result<Self, Self::Error> {
        Ok(match value {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(value) => Self::Integer(value),
            ValueRef::Real(value) => Self::Real(value),
            ValueRef::Text(bytes) => Self::Text(
                std::str::from_utf8(bytes)
                    .map_err(rusqlite::Error::Utf8Error)?
                    .to_string(),
            ),
            ValueRef::Blob(bytes) => Self::Blob(bytes.to_vec()),
        })
    }
}

fn push_where(sql: &mut String, selection: &Selection) {
    if let Some(clause) = selection
        .clause
        .as_deref()
        .filter(|clause| !clause.trim().is_empty())
    {
        sql.push_str(" WHERE ");
        sql.push_str(clause);
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::{quote_identifier, SqliteStorageEngine};
    use crate::db::{open_db_in_memory, DbError};
    use crate::storage::{FieldValue, Record, Selection, StorageEngine, StorageError};

    fn widget() -> Record {
        Record::new()
            .with("name", "Widget")
            .with("price", 5)
            .with("quantity", 10)
    }

    #[test]
    fn quote_identifier_escapes_embedded_quotes() {
        assert_eq!(quote_identifier("products"), "\"products\"");
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn insert_reports_constraint_violation_as_none() {
        let conn = open_db_in_memory().unwrap();
        let engine = SqliteStorageEngine::new(&conn);

        let missing_name = Record::new().with("price", 5);
        assert_eq!(engine.insert_row("products", &missing_name).unwrap(), None);
        assert_eq!(engine.insert_row("products", &widget()).unwrap(), Some(1));
    }

    #[test]
    fn insert_into_unknown_table_is_a_storage_fault() {
        let conn = open_db_in_memory().unwrap();
        let engine = SqliteStorageEngine::new(&conn);

        let err = engine.insert_row("missing", &widget()).unwrap_err();
        assert!(matches!(err, StorageError::Db(_)));
    }

    #[test]
    fn query_applies_projection_selection_and_sort() {
        let conn = open_db_in_memory().unwrap();
        let engine = SqliteStorageEngine::new(&conn);
        engine.insert_row("products", &widget()).unwrap();
        engine
            .insert_row("products", &widget().with("name", "Anvil").with("price", 50))
            .unwrap();

        let rows = engine
            .query_rows(
                "products",
                Some(&["name", "price"]),
                &Selection::new("price >= ?", [1]),
                Some("name ASC"),
            )
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].columns().collect::<Vec<_>>(), ["name", "price"]);
        assert_eq!(rows[0].get_str("name"), Some("Anvil"));
        assert_eq!(rows[1].get("price"), Some(&FieldValue::Integer(5)));
    }

    #[test]
    fn update_binds_values_before_selection_args() {
        let conn = open_db_in_memory().unwrap();
        let engine = SqliteStorageEngine::new(&conn);
        engine.insert_row("products", &widget()).unwrap();

        let changed = engine
            .update_rows(
                "products",
                &Record::new().with("quantity", 3),
                &Selection::new("name = ?", ["Widget"]),
            )
            .unwrap();
        assert_eq!(changed, 1);

        let rows = engine
            .query_rows("products", None, &Selection::all(), None)
            .unwrap();
        assert_eq!(rows[0].get_i64("quantity"), Some(3));
    }

    #[test]
    fn query_rejects_text_cells_with_invalid_utf8() {
        let conn = open_db_in_memory().unwrap();
        conn.execute(
            "INSERT INTO products (name) VALUES (CAST(? AS TEXT))",
            [vec![87_u8, 255]],
        )
        .unwrap();
        let engine = SqliteStorageEngine::new(&conn);

        let err = engine
            .query_rows("products", Some(&["name"]), &Selection::all(), None)
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::Db(DbError::Sqlite(rusqlite::Error::Utf8Error(_)))
        ));
    }

    #[test]
    fn update_with_empty_record_is_rejected() {
        let conn = open_db_in_memory().unwrap();
        let engine = SqliteStorageEngine::new(&conn);

        let err = engine
            .update_rows("products", &Record::new(), &Selection::all())
            .unwrap_err();
        assert!(matches!(err, StorageError::EmptyValues { .. }));
    }
}
