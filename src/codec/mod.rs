//! Conversions at the wire boundary.
//!
//! - `decode`: hex text from binary-family columns into bytes
//! - `params`: ORM arguments into the values the serverless client sends
//! - `temporal`: UTC date/time parsing and formatting

pub mod decode;
pub mod params;
pub mod temporal;

pub use decode::{ColumnDecoder, DecoderMap, hex_to_bytes};
pub use params::{Params, WireArg, encode_arg};
pub use temporal::{TemporalTarget, format_date, format_date_time, format_time, parse_datetime};
