use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::client::TxHandle;
use crate::driver::{SqlQueryable, SqlTransaction};
use crate::error::SqlAdapterError;
use crate::executor::Queryable;
use crate::logging::AdapterLog;
use crate::query::Query;
use crate::results::SqlResultSet;

/// Per-transaction settings handed to the ORM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOptions {
    /// Whether the ORM should issue phantom statements instead of real
    /// BEGIN/COMMIT to keep its own bookkeeping in step with the session.
    pub use_phantom_query: bool,
}

/// Where a transaction is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    Active,
    Committed,
    RolledBack,
}

/// A transaction session opened off an adapter's connection.
///
/// Owns the remote transaction handle, not the connection. If the transaction is
/// dropped or disposed before `commit`/`rollback`, it is rolled back.
pub struct Transaction {
    queryable: Queryable<dyn TxHandle>,
    options: TransactionOptions,
    state: TxState,
}

impl Transaction {
    pub(crate) fn new(
        handle: Arc<dyn TxHandle>,
        options: TransactionOptions,
        logger: Arc<dyn AdapterLog>,
    ) -> Self {
        Self {
            queryable: Queryable::new(handle, logger),
            options,
            state: TxState::Active,
        }
    }

    #[must_use]
    pub fn state(&self) -> TxState {
        self.state
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state != TxState::Active
    }

    fn logger(&self) -> &Arc<dyn AdapterLog> {
        self.queryable.logger()
    }
}

#[async_trait]
impl SqlQueryable for Transaction {
    async fn query_raw(&self, query: &Query) -> Result<SqlResultSet, SqlAdapterError> {
        self.queryable.query_raw(query).await
    }

    async fn execute_raw(&self, query: &Query) -> Result<u32, SqlAdapterError> {
        self.queryable.execute_raw(query).await
    }
}

#[async_trait]
impl SqlTransaction for Transaction {
    fn options(&self) -> &TransactionOptions {
        &self.options
    }

    // The state flips before the await so a drop mid-call cannot trigger a second
    // rollback. Calls after finish go to the client, which decides what to do.
    async fn commit(&mut self) -> Result<(), SqlAdapterError> {
        self.logger().debug("[commit]", &self.state);
        self.state = TxState::Committed;
        self.queryable.client().commit().await?;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), SqlAdapterError> {
        self.logger().debug("[rollback]", &self.state);
        self.state = TxState::RolledBack;
        self.queryable.client().rollback().await?;
        Ok(())
    }

    async fn dispose(&mut self) {
        if self.is_finished() {
            return;
        }
        if let Err(e) = self.rollback().await {
            self.logger().error("[dispose]", &e);
        }
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if self.is_finished() {
            return;
        }
        self.state = TxState::RolledBack;
        let handle = Arc::clone(self.queryable.client());
        let logger = Arc::clone(self.logger());
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            runtime.spawn(async move {
                logger.debug("[dispose]", &"rolling back unfinished transaction");
                if let Err(e) = handle.rollback().await {
                    logger.error("[dispose]", &e);
                }
            });
        } else {
            logger.warn(
                "[dispose]",
                "transaction dropped outside a tokio runtime; rollback not issued",
            );
        }
    }
}
