//! Convenient imports for common functionality.
//!
//! Brings the adapter, its factory, the driver traits and the value types into scope.

pub use crate::adapter::{Adapter, AdapterFactory};
pub use crate::catalog::WireColumnType;
pub use crate::client::{Connection, Connector, TxHandle};
pub use crate::config::{AdapterOptions, AdapterOptionsBuilder, ClientConfig};
pub use crate::driver::{SqlDriverAdapter, SqlDriverAdapterFactory, SqlQueryable, SqlTransaction};
pub use crate::error::{ClientError, SqlAdapterError};
pub use crate::legacy::{Tagged, TaggedAdapter, TaggedAdapterFactory};
pub use crate::logging::{AdapterLog, NoopLog, TracingLog};
pub use crate::query::{Arg, Query};
pub use crate::results::{ConnectionInfo, SqlResultSet};
pub use crate::transaction::{Transaction, TransactionOptions, TxState};
pub use crate::types::{
    ArgType, ArgValue, ColumnType, ContractVersion, IsolationLevel, RowValues, ScalarType,
};
