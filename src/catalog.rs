//! Wire column types reported by the serverless client and their mapping onto
//! [`ColumnType`].

use std::fmt;
use std::str::FromStr;

use crate::error::SqlAdapterError;
use crate::types::ColumnType;

/// Column type tags as the remote engine spells them in a full result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireColumnType {
    Null,
    TinyInt,
    UnsignedTinyInt,
    SmallInt,
    UnsignedSmallInt,
    MediumInt,
    UnsignedMediumInt,
    Int,
    UnsignedInt,
    Year,
    Float,
    Double,
    BigInt,
    UnsignedBigInt,
    Decimal,
    Char,
    VarChar,
    Binary,
    VarBinary,
    TinyText,
    Text,
    MediumText,
    LongText,
    TinyBlob,
    Blob,
    MediumBlob,
    LongBlob,
    Date,
    Time,
    DateTime,
    Timestamp,
    Json,
    Bit,
    Set,
    Enum,
}

impl WireColumnType {
    pub const ALL: [WireColumnType; 35] = [
        WireColumnType::Null,
        WireColumnType::TinyInt,
        WireColumnType::UnsignedTinyInt,
        WireColumnType::SmallInt,
        WireColumnType::UnsignedSmallInt,
        WireColumnType::MediumInt,
        WireColumnType::UnsignedMediumInt,
        WireColumnType::Int,
        WireColumnType::UnsignedInt,
        WireColumnType::Year,
        WireColumnType::Float,
        WireColumnType::Double,
        WireColumnType::BigInt,
        WireColumnType::UnsignedBigInt,
        WireColumnType::Decimal,
        WireColumnType::Char,
        WireColumnType::VarChar,
        WireColumnType::Binary,
        WireColumnType::VarBinary,
        WireColumnType::TinyText,
        WireColumnType::Text,
        WireColumnType::MediumText,
        WireColumnType::LongText,
        WireColumnType::TinyBlob,
        WireColumnType::Blob,
        WireColumnType::MediumBlob,
        WireColumnType::LongBlob,
        WireColumnType::Date,
        WireColumnType::Time,
        WireColumnType::DateTime,
        WireColumnType::Timestamp,
        WireColumnType::Json,
        WireColumnType::Bit,
        WireColumnType::Set,
        WireColumnType::Enum,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            WireColumnType::Null => "NULL",
            WireColumnType::TinyInt => "TINYINT",
            WireColumnType::UnsignedTinyInt => "UNSIGNED TINYINT",
            WireColumnType::SmallInt => "SMALLINT",
            WireColumnType::UnsignedSmallInt => "UNSIGNED SMALLINT",
            WireColumnType::MediumInt => "MEDIUMINT",
            WireColumnType::UnsignedMediumInt => "UNSIGNED MEDIUMINT",
            WireColumnType::Int => "INT",
            WireColumnType::UnsignedInt => "UNSIGNED INT",
            WireColumnType::Year => "YEAR",
            WireColumnType::Float => "FLOAT",
            WireColumnType::Double => "DOUBLE",
            WireColumnType::BigInt => "BIGINT",
            WireColumnType::UnsignedBigInt => "UNSIGNED BIGINT",
            WireColumnType::Decimal => "DECIMAL",
            WireColumnType::Char => "CHAR",
            WireColumnType::VarChar => "VARCHAR",
            WireColumnType::Binary => "BINARY",
            WireColumnType::VarBinary => "VARBINARY",
            WireColumnType::TinyText => "TINYTEXT",
            WireColumnType::Text => "TEXT",
            WireColumnType::MediumText => "MEDIUMTEXT",
            WireColumnType::LongText => "LONGTEXT",
            WireColumnType::TinyBlob => "TINYBLOB",
            WireColumnType::Blob => "BLOB",
            WireColumnType::MediumBlob => "MEDIUMBLOB",
            WireColumnType::LongBlob => "LONGBLOB",
            WireColumnType::Date => "DATE",
            WireColumnType::Time => "TIME",
            WireColumnType::DateTime => "DATETIME",
            WireColumnType::Timestamp => "TIMESTAMP",
            WireColumnType::Json => "JSON",
            WireColumnType::Bit => "BIT",
            WireColumnType::Set => "SET",
            WireColumnType::Enum => "ENUM",
        }
    }

    /// Normalized category for this wire type.
    ///
    /// This is a simplification of the engine-side inference, which also looks at
    /// field length and flags; the tag alone decides here.
    #[must_use]
    pub fn classify(self) -> ColumnType {
        match self {
            WireColumnType::TinyInt
            | WireColumnType::UnsignedTinyInt
            | WireColumnType::SmallInt
            | WireColumnType::UnsignedSmallInt
            | WireColumnType::MediumInt
            | WireColumnType::UnsignedMediumInt
            | WireColumnType::Int
            | WireColumnType::Year => ColumnType::Int32,
            WireColumnType::UnsignedInt
            | WireColumnType::BigInt
            | WireColumnType::UnsignedBigInt => ColumnType::Int64,
            WireColumnType::Float => ColumnType::Float,
            WireColumnType::Double => ColumnType::Double,
            WireColumnType::Timestamp | WireColumnType::DateTime => ColumnType::DateTime,
            WireColumnType::Date => ColumnType::Date,
            WireColumnType::Time => ColumnType::Time,
            WireColumnType::Decimal => ColumnType::Numeric,
            WireColumnType::Char
            | WireColumnType::VarChar
            | WireColumnType::TinyText
            | WireColumnType::Text
            | WireColumnType::MediumText
            | WireColumnType::LongText => ColumnType::Text,
            WireColumnType::Json => ColumnType::Json,
            WireColumnType::TinyBlob
            | WireColumnType::Blob
            | WireColumnType::MediumBlob
            | WireColumnType::LongBlob
            | WireColumnType::Binary
            | WireColumnType::VarBinary
            | WireColumnType::Bit => ColumnType::Bytes,
            WireColumnType::Set => ColumnType::Set,
            WireColumnType::Enum => ColumnType::Enum,
            // Compatibility shim: the query engine's own inference reads NULL
            // columns as Int32, so we report the same.
            WireColumnType::Null => ColumnType::Int32,
        }
    }

    /// Whether the client ships values of this type as hex text.
    #[must_use]
    pub fn is_binary(self) -> bool {
        self.classify() == ColumnType::Bytes
    }
}

impl FromStr for WireColumnType {
    type Err = SqlAdapterError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        WireColumnType::ALL
            .iter()
            .copied()
            .find(|ty| ty.as_str() == tag)
            .ok_or_else(|| SqlAdapterError::UnsupportedColumnType(tag.to_owned()))
    }
}

impl fmt::Display for WireColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a raw type tag from a result's metadata.
///
/// # Errors
/// Returns `SqlAdapterError::UnsupportedColumnType` carrying the tag when it is not a
/// known wire type.
pub fn column_type_from_tag(tag: &str) -> Result<ColumnType, SqlAdapterError> {
    tag.parse::<WireColumnType>().map(WireColumnType::classify)
}
