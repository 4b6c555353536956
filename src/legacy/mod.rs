//! Façade for the older consumer contract: every fallible call returns a
//! [`Tagged`] envelope, and transactions open in two steps through a
//! [`TransactionContext`].
//!
//! Nothing here re-implements execution; it all delegates to [`Adapter`] and
//! [`Transaction`].

mod tagged;

pub use tagged::{ErrorInfo, Tagged};

use crate::adapter::{Adapter, AdapterFactory};
use crate::client::Connector;
use crate::config::{AdapterOptions, ClientConfig};
use crate::driver::{PROVIDER, SqlDriverAdapter, SqlQueryable, SqlTransaction};
use crate::query::Query;
use crate::results::{ConnectionInfo, SqlResultSet};
use crate::transaction::{Transaction, TransactionOptions, TxState};
use crate::types::ContractVersion;

pub struct TaggedAdapter {
    inner: Adapter,
}

impl TaggedAdapter {
    #[must_use]
    pub fn new(inner: Adapter) -> Self {
        Self { inner }
    }

    #[must_use]
    pub fn provider(&self) -> &'static str {
        PROVIDER
    }

    pub async fn query_raw(&self, query: &Query) -> Tagged<SqlResultSet> {
        self.inner.query_raw(query).await.into()
    }

    pub async fn execute_raw(&self, query: &Query) -> Tagged<u32> {
        self.inner.execute_raw(query).await.into()
    }

    pub async fn execute_script(&self, script: &str) -> Tagged<()> {
        self.inner.execute_script(script).await.into()
    }

    #[must_use]
    pub fn connection_info(&self) -> Tagged<ConnectionInfo> {
        Tagged::Ok(self.inner.connection_info())
    }

    /// First step of opening a transaction.
    pub async fn transaction_context(&self) -> Tagged<TransactionContext<'_>> {
        self.inner
            .queryable()
            .logger()
            .debug("[transaction_context]", &self.inner.transaction_options());
        Tagged::Ok(TransactionContext {
            adapter: &self.inner,
        })
    }

    pub async fn dispose(&self) -> Tagged<()> {
        self.inner.dispose().await.into()
    }

    #[must_use]
    pub fn into_inner(self) -> Adapter {
        self.inner
    }
}

/// Scope from which a transaction is started. Statements run through it go
/// straight to the connection.
pub struct TransactionContext<'a> {
    adapter: &'a Adapter,
}

impl TransactionContext<'_> {
    pub async fn query_raw(&self, query: &Query) -> Tagged<SqlResultSet> {
        self.adapter.query_raw(query).await.into()
    }

    pub async fn execute_raw(&self, query: &Query) -> Tagged<u32> {
        self.adapter.execute_raw(query).await.into()
    }

    /// Second step: issue begin on the connection.
    pub async fn start_transaction(&self) -> Tagged<TaggedTransaction> {
        self.adapter
            .start_transaction(None)
            .await
            .map(|inner| TaggedTransaction { inner })
            .into()
    }
}

pub struct TaggedTransaction {
    inner: Transaction,
}

impl TaggedTransaction {
    #[must_use]
    pub fn options(&self) -> &TransactionOptions {
        self.inner.options()
    }

    #[must_use]
    pub fn state(&self) -> TxState {
        self.inner.state()
    }

    pub async fn query_raw(&self, query: &Query) -> Tagged<SqlResultSet> {
        self.inner.query_raw(query).await.into()
    }

    pub async fn execute_raw(&self, query: &Query) -> Tagged<u32> {
        self.inner.execute_raw(query).await.into()
    }

    pub async fn commit(&mut self) -> Tagged<()> {
        self.inner.commit().await.into()
    }

    pub async fn rollback(&mut self) -> Tagged<()> {
        self.inner.rollback().await.into()
    }

    /// Always `Ok`: disposal failures only reach the log sink.
    pub async fn dispose(&mut self) -> Tagged<()> {
        self.inner.dispose().await;
        Tagged::Ok(())
    }
}

/// Factory for tagged adapters. Defaults to the tagged contract's options.
pub struct TaggedAdapterFactory<K> {
    inner: AdapterFactory<K>,
}

impl<K: Connector> TaggedAdapterFactory<K> {
    #[must_use]
    pub fn new(connector: K, config: ClientConfig) -> Self {
        Self::with_options(connector, config, AdapterOptions::new(ContractVersion::Tagged))
    }

    #[must_use]
    pub fn with_options(connector: K, config: ClientConfig, options: AdapterOptions) -> Self {
        Self {
            inner: AdapterFactory::with_options(connector, config, options),
        }
    }

    pub async fn connect(&self) -> Tagged<TaggedAdapter> {
        self.inner.open().await.map(TaggedAdapter::new).into()
    }

    #[must_use]
    pub fn options(&self) -> &AdapterOptions {
        self.inner.options()
    }
}

impl From<Adapter> for TaggedAdapter {
    fn from(inner: Adapter) -> Self {
        Self::new(inner)
    }
}
