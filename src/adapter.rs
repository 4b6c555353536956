use std::sync::Arc;

use async_trait::async_trait;

use crate::client::{Connection, Connector};
use crate::config::{AdapterOptions, ClientConfig};
use crate::driver::{SqlDriverAdapter, SqlDriverAdapterFactory, SqlQueryable};
use crate::error::SqlAdapterError;
use crate::executor::Queryable;
use crate::query::Query;
use crate::results::{ConnectionInfo, SqlResultSet};
use crate::transaction::{Transaction, TransactionOptions};
use crate::types::IsolationLevel;

/// Adapter over one serverless connection.
///
/// The connection belongs to this adapter for its whole life. The remote session
/// holds a single active transaction, so callers sequence `start_transaction` calls.
pub struct Adapter {
    queryable: Queryable<dyn Connection>,
    options: AdapterOptions,
}

impl Adapter {
    #[must_use]
    pub fn new(connection: Arc<dyn Connection>, options: AdapterOptions) -> Self {
        let logger = Arc::clone(&options.logger);
        Self {
            queryable: Queryable::new(connection, logger),
            options,
        }
    }

    #[must_use]
    pub fn options(&self) -> &AdapterOptions {
        &self.options
    }

    pub(crate) fn connection(&self) -> &Arc<dyn Connection> {
        self.queryable.client()
    }

    /// Options every transaction from this adapter is created with.
    #[must_use]
    pub fn transaction_options(&self) -> TransactionOptions {
        TransactionOptions {
            use_phantom_query: self.options.use_phantom_query(),
        }
    }

    pub(crate) fn queryable(&self) -> &Queryable<dyn Connection> {
        &self.queryable
    }
}

#[async_trait]
impl SqlQueryable for Adapter {
    async fn query_raw(&self, query: &Query) -> Result<SqlResultSet, SqlAdapterError> {
        self.queryable.query_raw(query).await
    }

    async fn execute_raw(&self, query: &Query) -> Result<u32, SqlAdapterError> {
        self.queryable.execute_raw(query).await
    }
}

#[async_trait]
impl SqlDriverAdapter for Adapter {
    type Transaction = Transaction;

    async fn execute_script(&self, _script: &str) -> Result<(), SqlAdapterError> {
        Err(SqlAdapterError::Unimplemented(
            "executeScript is not supported by the serverless adapter".into(),
        ))
    }

    fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            schema_name: self.connection().config().schema_name().to_owned(),
        }
    }

    async fn start_transaction(
        &self,
        isolation: Option<IsolationLevel>,
    ) -> Result<Transaction, SqlAdapterError> {
        let options = self.transaction_options();
        let logger = Arc::clone(self.queryable.logger());
        logger.debug("[start_transaction]", &(options, isolation));

        let handle = self
            .connection()
            .begin(isolation)
            .await
            .inspect_err(|e| logger.error("[start_transaction]", e))?;
        Ok(Transaction::new(handle, options, logger))
    }
}

/// Produces adapters, one fresh connection per `connect` call.
pub struct AdapterFactory<K> {
    connector: K,
    config: ClientConfig,
    options: AdapterOptions,
}

impl<K: Connector> AdapterFactory<K> {
    #[must_use]
    pub fn new(connector: K, config: ClientConfig) -> Self {
        Self::with_options(connector, config, AdapterOptions::default())
    }

    #[must_use]
    pub fn with_options(connector: K, config: ClientConfig, options: AdapterOptions) -> Self {
        Self {
            connector,
            config,
            options,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn options(&self) -> &AdapterOptions {
        &self.options
    }

    pub(crate) async fn open(&self) -> Result<Adapter, SqlAdapterError> {
        let config = self.config.clone().resolve()?;
        self.options.logger.debug("[connect]", &config);
        let connection = self.connector.connect(&config).await?;
        Ok(Adapter::new(connection, self.options.clone()))
    }
}

#[async_trait]
impl<K: Connector> SqlDriverAdapterFactory for AdapterFactory<K> {
    type Adapter = Adapter;

    async fn connect(&self) -> Result<Adapter, SqlAdapterError> {
        self.open().await
    }
}
