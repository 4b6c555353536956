//! The contract the ORM's driver-adapter layer programs against.

use async_trait::async_trait;

use crate::error::SqlAdapterError;
use crate::query::Query;
use crate::results::{ConnectionInfo, SqlResultSet};
use crate::transaction::TransactionOptions;
use crate::types::IsolationLevel;

/// SQL dialect family reported to the ORM.
pub const PROVIDER: &str = "mysql";

pub const ADAPTER_NAME: &str = env!("CARGO_PKG_NAME");

#[async_trait]
pub trait SqlQueryable: Send + Sync {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn adapter_name(&self) -> &'static str {
        ADAPTER_NAME
    }

    /// Execute a query given as SQL, binding the given arguments.
    ///
    /// # Errors
    /// Returns the remote client's error unchanged when the statement fails.
    async fn query_raw(&self, query: &Query) -> Result<SqlResultSet, SqlAdapterError>;

    /// Execute a statement and return the number of affected rows.
    ///
    /// # Errors
    /// Returns the remote client's error unchanged when the statement fails.
    async fn execute_raw(&self, query: &Query) -> Result<u32, SqlAdapterError>;
}

#[async_trait]
pub trait SqlTransaction: SqlQueryable {
    fn options(&self) -> &TransactionOptions;

    /// # Errors
    /// Returns the remote client's error if the commit fails.
    async fn commit(&mut self) -> Result<(), SqlAdapterError>;

    /// # Errors
    /// Returns the remote client's error if the rollback fails.
    async fn rollback(&mut self) -> Result<(), SqlAdapterError>;

    /// Roll back if neither commit nor rollback ran. Never fails.
    async fn dispose(&mut self);
}

#[async_trait]
pub trait SqlDriverAdapter: SqlQueryable {
    type Transaction: SqlTransaction;

    /// # Errors
    /// Always `SqlAdapterError::Unimplemented` for this adapter.
    async fn execute_script(&self, script: &str) -> Result<(), SqlAdapterError>;

    fn connection_info(&self) -> ConnectionInfo;

    /// # Errors
    /// Returns the remote client's error if the transaction cannot be opened.
    async fn start_transaction(
        &self,
        isolation: Option<IsolationLevel>,
    ) -> Result<Self::Transaction, SqlAdapterError>;

    /// Release adapter-level resources.
    ///
    /// # Errors
    /// Implementations that hold nothing beyond the connection never fail.
    async fn dispose(&self) -> Result<(), SqlAdapterError> {
        Ok(())
    }
}

#[async_trait]
pub trait SqlDriverAdapterFactory: Send + Sync {
    type Adapter: SqlDriverAdapter;

    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn adapter_name(&self) -> &'static str {
        ADAPTER_NAME
    }

    /// # Errors
    /// Returns an error if a connection cannot be constructed from the configuration.
    async fn connect(&self) -> Result<Self::Adapter, SqlAdapterError>;
}
