//! The slice of the serverless client this crate depends on.
//!
//! HTTP framing and authentication live behind these traits; the adapter only
//! dispatches statements and drives transactions through them.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::codec::{DecoderMap, WireArg};
use crate::config::ClientConfig;
use crate::error::{ClientError, SqlAdapterError};
use crate::types::{IsolationLevel, RowValues};

/// Per-statement switches passed to the client.
#[derive(Debug, Clone, Copy)]
pub struct ExecuteOptions<'a> {
    /// Rows as positional arrays instead of keyed objects.
    pub array_mode: bool,
    /// Include column metadata, affected rows and last insert id.
    pub full_result: bool,
    pub decoders: &'a DecoderMap,
}

impl ExecuteOptions<'static> {
    /// Array rows, full metadata, binary decoders.
    #[must_use]
    pub fn full() -> Self {
        Self {
            array_mode: true,
            full_result: true,
            decoders: DecoderMap::binary(),
        }
    }
}

/// The client may report the last insert id as a number or, past 2^53, as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastInsertId {
    Int(u64),
    Text(String),
}

impl fmt::Display for LastInsertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LastInsertId::Int(id) => write!(f, "{id}"),
            LastInsertId::Text(id) => f.write_str(id),
        }
    }
}

/// A full result as returned by the client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FullResult {
    /// Column name to wire type tag, in column order.
    pub types: Vec<(String, String)>,
    pub rows: Vec<Vec<RowValues>>,
    pub rows_affected: u64,
    pub last_insert_id: Option<LastInsertId>,
}

/// Anything that runs a statement: a connection or an open transaction.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    async fn execute(
        &self,
        sql: &str,
        args: &[WireArg],
        options: ExecuteOptions<'_>,
    ) -> Result<FullResult, ClientError>;
}

/// A live connection to the serverless endpoint.
#[async_trait]
pub trait Connection: SqlExecutor {
    fn config(&self) -> &ClientConfig;

    /// Open a transaction session. The isolation level is passed to the server as is.
    async fn begin(
        &self,
        isolation: Option<IsolationLevel>,
    ) -> Result<Arc<dyn TxHandle>, ClientError>;
}

/// An open transaction session on the remote side.
#[async_trait]
pub trait TxHandle: SqlExecutor {
    async fn commit(&self) -> Result<(), ClientError>;

    async fn rollback(&self) -> Result<(), ClientError>;
}

/// Builds connections from configuration. Every call yields a fresh connection.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, config: &ClientConfig) -> Result<Arc<dyn Connection>, SqlAdapterError>;
}
