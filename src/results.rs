use serde::Serialize;

use crate::error::SqlAdapterError;
use crate::types::{ColumnType, RowValues};

/// A result set as handed to the ORM.
///
/// Column names and types are parallel; every row has one value per column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlResultSet {
    /// Column names in the order the engine reported them
    pub column_names: Vec<String>,
    /// Normalized type of each column
    pub column_types: Vec<ColumnType>,
    /// Rows in array form
    pub rows: Vec<Vec<RowValues>>,
    /// Rendered as text so 64-bit ids survive any consumer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_insert_id: Option<String>,
}

impl SqlResultSet {
    /// Assemble a result set, checking the shape invariants.
    ///
    /// # Errors
    /// Returns `SqlAdapterError::ExecutionError` if names and types differ in length or
    /// a row has the wrong number of values.
    pub fn new(
        column_names: Vec<String>,
        column_types: Vec<ColumnType>,
        rows: Vec<Vec<RowValues>>,
        last_insert_id: Option<String>,
    ) -> Result<Self, SqlAdapterError> {
        if column_names.len() != column_types.len() {
            return Err(SqlAdapterError::ExecutionError(format!(
                "{} column names but {} column types",
                column_names.len(),
                column_types.len()
            )));
        }
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != column_names.len())
        {
            return Err(SqlAdapterError::ExecutionError(format!(
                "row {idx} has {} values, expected {}",
                row.len(),
                column_names.len()
            )));
        }
        Ok(Self {
            column_names,
            column_types,
            rows,
            last_insert_id,
        })
    }

    /// Get the index of a column by name
    #[must_use]
    pub fn column_index(&self, column_name: &str) -> Option<usize> {
        self.column_names.iter().position(|col| col == column_name)
    }

    #[must_use]
    pub fn row(&self, index: usize) -> Option<ResultRow<'_>> {
        self.rows.get(index).map(|values| ResultRow { set: self, values })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A borrowed row with by-name access.
#[derive(Debug, Clone, Copy)]
pub struct ResultRow<'a> {
    set: &'a SqlResultSet,
    values: &'a [RowValues],
}

impl<'a> ResultRow<'a> {
    /// Get a value from the row by column name
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&'a RowValues> {
        self.set
            .column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }
}

/// Metadata about the connection an adapter owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    pub schema_name: String,
}
