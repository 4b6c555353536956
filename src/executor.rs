use std::sync::Arc;

use crate::catalog::column_type_from_tag;
use crate::client::{ExecuteOptions, FullResult, SqlExecutor};
use crate::codec::Params;
use crate::error::SqlAdapterError;
use crate::logging::AdapterLog;
use crate::query::Query;
use crate::results::SqlResultSet;
use crate::types::ColumnType;

/// Statement execution shared by adapters and transactions.
///
/// Holds whichever client handle the owner runs against (the connection or an open
/// transaction) plus the injected log sink.
pub struct Queryable<C: ?Sized> {
    client: Arc<C>,
    logger: Arc<dyn AdapterLog>,
}

impl<C: ?Sized> Clone for Queryable<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            logger: Arc::clone(&self.logger),
        }
    }
}

impl<C: SqlExecutor + ?Sized> Queryable<C> {
    pub fn new(client: Arc<C>, logger: Arc<dyn AdapterLog>) -> Self {
        Self { client, logger }
    }

    #[must_use]
    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    #[must_use]
    pub fn logger(&self) -> &Arc<dyn AdapterLog> {
        &self.logger
    }

    /// Execute a query and return its rows with normalized column types.
    ///
    /// # Errors
    /// Returns the client's error unchanged if the statement fails, or
    /// `SqlAdapterError::UnsupportedColumnType` if the reply names an unknown type.
    pub async fn query_raw(&self, query: &Query) -> Result<SqlResultSet, SqlAdapterError> {
        self.logger.debug("[query_raw]", query);
        let result = self.perform_io(query).await?;
        build_result_set(result)
    }

    /// Execute a statement and return the number of affected rows.
    ///
    /// The count is 32-bit at the ORM boundary; larger counts saturate.
    ///
    /// # Errors
    /// Returns the client's error unchanged if the statement fails.
    pub async fn execute_raw(&self, query: &Query) -> Result<u32, SqlAdapterError> {
        self.logger.debug("[execute_raw]", query);
        let result = self.perform_io(query).await?;
        Ok(u32::try_from(result.rows_affected).unwrap_or_else(|_| {
            self.logger
                .debug("[execute_raw] affected rows saturated", &result.rows_affected);
            u32::MAX
        }))
    }

    async fn perform_io(&self, query: &Query) -> Result<FullResult, SqlAdapterError> {
        let outcome = match Params::convert(&query.args) {
            Ok(params) => self
                .client
                .execute(&query.sql, params.as_slice(), ExecuteOptions::full())
                .await
                .map_err(SqlAdapterError::from),
            Err(e) => Err(e),
        };
        outcome.inspect_err(|e| self.logger.error("[perform_io]", e))
    }
}

/// Turn a client reply into a result set: names in reported order, types through
/// the catalog, rows untouched.
///
/// # Errors
/// Returns `SqlAdapterError::UnsupportedColumnType` for an unknown type tag, or
/// `SqlAdapterError::ExecutionError` if the rows do not match the columns.
pub fn build_result_set(result: FullResult) -> Result<SqlResultSet, SqlAdapterError> {
    let FullResult {
        types,
        rows,
        last_insert_id,
        ..
    } = result;

    let mut column_names = Vec::with_capacity(types.len());
    let mut column_types: Vec<ColumnType> = Vec::with_capacity(types.len());
    for (name, tag) in types {
        column_types.push(column_type_from_tag(&tag)?);
        column_names.push(name);
    }

    SqlResultSet::new(
        column_names,
        column_types,
        rows,
        last_insert_id.map(|id| id.to_string()),
    )
}
