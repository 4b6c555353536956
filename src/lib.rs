//! Driver adapter that lets an ORM's query engine talk to a TiDB Cloud
//! serverless endpoint through its HTTP client.
//!
//! The adapter holds one connection, turns ORM arguments into the values the
//! client sends, asks for full results with hex-decoded binary columns, and
//! normalizes the reported column types. Transactions open on the same
//! connection and roll back if they are left unfinished.
//!
//! Two consumer contracts are served:
//! - [`Adapter`] implements the [`driver`] traits and returns `Result`s
//! - [`legacy::TaggedAdapter`] wraps every fallible call in a [`legacy::Tagged`] envelope

pub mod adapter;
pub mod catalog;
pub mod client;
pub mod codec;
pub mod config;
pub mod driver;
pub mod error;
pub mod executor;
pub mod legacy;
pub mod logging;
pub mod prelude;
pub mod query;
pub mod results;
pub mod transaction;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapter::{Adapter, AdapterFactory};
pub use catalog::{WireColumnType, column_type_from_tag};
pub use config::{AdapterOptions, AdapterOptionsBuilder, ClientConfig};
pub use driver::{SqlDriverAdapter, SqlDriverAdapterFactory, SqlQueryable, SqlTransaction};
pub use error::{ClientError, SqlAdapterError};
pub use query::{Arg, Query};
pub use results::{ConnectionInfo, SqlResultSet};
pub use transaction::{Transaction, TransactionOptions, TxState};
pub use types::{
    ArgType, ArgValue, ColumnType, ContractVersion, IsolationLevel, RowValues, ScalarType,
};
