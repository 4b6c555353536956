use bytes::Bytes;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Values carried in result rows.
///
/// Rows come back from the remote client already shaped (array mode plus the binary
/// decoders), so this is the whole vocabulary a cell can hold:
/// ```rust
/// use tidbcloud_driver_adapter::prelude::*;
///
/// let row = vec![
///     RowValues::Int(1),
///     RowValues::Text("alice".into()),
///     RowValues::Blob(vec![0xA1]),
/// ];
/// # let _ = row;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RowValues {
    /// NULL value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value, also used for decimals and temporal values
    Text(String),
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let RowValues::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }
}

/// Normalized column categories exposed to the ORM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ColumnType {
    Int32,
    Int64,
    Float,
    Double,
    Numeric,
    Text,
    Bytes,
    Date,
    Time,
    DateTime,
    Json,
    Set,
    Enum,
}

/// Scalar tag the ORM attaches to every argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    String,
    Int,
    BigInt,
    Float,
    Decimal,
    Boolean,
    Enum,
    Uuid,
    Json,
    DateTime,
    Bytes,
    Unknown,
}

/// Type information for one positional argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgType {
    pub scalar_type: ScalarType,
    /// Declared column type of the target, e.g. `DATE` or `TIME2`.
    pub db_type: Option<String>,
}

impl ArgType {
    #[must_use]
    pub fn new(scalar_type: ScalarType) -> Self {
        Self {
            scalar_type,
            db_type: None,
        }
    }

    #[must_use]
    pub fn with_db_type(mut self, db_type: impl Into<String>) -> Self {
        self.db_type = Some(db_type.into());
        self
    }
}

impl Default for ArgType {
    fn default() -> Self {
        Self::new(ScalarType::Unknown)
    }
}

/// Argument values as handed over by the ORM, before encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(DateTime<Utc>),
    /// A view over shared byte storage.
    Bytes(Bytes),
    Array(Vec<JsonValue>),
    Json(JsonValue),
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Text(value.to_owned())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Text(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        ArgValue::Int(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for ArgValue {
    fn from(value: DateTime<Utc>) -> Self {
        ArgValue::DateTime(value)
    }
}

/// Transaction isolation levels accepted by `start_transaction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
pub enum IsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Snapshot,
    Serializable,
}

/// The consumer contract an adapter is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
pub enum ContractVersion {
    /// Errors are returned directly and transactions start off the connection.
    #[default]
    Direct,
    /// Results are wrapped in `Tagged` and transactions open through a context.
    Tagged,
}

impl ContractVersion {
    /// Whether transactions produced under this contract ask the ORM for phantom queries.
    #[must_use]
    pub fn default_phantom_query(self) -> bool {
        match self {
            ContractVersion::Direct => true,
            ContractVersion::Tagged => false,
        }
    }
}
