use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use bytes::Bytes;
use serde_json::Value as JsonValue;

use super::temporal::{TemporalTarget, parse_datetime};
use crate::error::SqlAdapterError;
use crate::query::Arg;
use crate::types::{ArgValue, ScalarType};

// The ORM sends bytes as standard base64 but is not consistent about padding.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Argument values in the shape the serverless client puts on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum WireArg {
    Null,
    Bool(bool),
    Int(i64),
    /// Wide enough for the whole signed and unsigned 64-bit column range.
    BigInt(i128),
    Float(f64),
    Text(String),
    Bytes(Bytes),
    Json(JsonValue),
}

/// Container for encoded positional arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(pub Vec<WireArg>);

impl Params {
    /// Encode every argument, keeping placeholder order.
    ///
    /// # Errors
    /// Returns the first `SqlAdapterError::ParameterError` hit while encoding.
    pub fn convert(args: &[Arg]) -> Result<Params, SqlAdapterError> {
        let mut wire = Vec::with_capacity(args.len());
        for (idx, arg) in args.iter().enumerate() {
            let value = encode_arg(arg).map_err(|e| match e {
                SqlAdapterError::ParameterError(msg) => {
                    SqlAdapterError::ParameterError(format!("argument {idx}: {msg}"))
                }
                other => other,
            })?;
            wire.push(value);
        }
        Ok(Params(wire))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[WireArg] {
        &self.0
    }
}

/// Encode one ORM argument for the remote client.
///
/// Dates are always rendered in UTC according to the target column's declared type.
///
/// # Errors
/// Returns `SqlAdapterError::ParameterError` when tagged text does not parse as the
/// tagged scalar, or a byte array holds something other than values in `0..=255`.
pub fn encode_arg(arg: &Arg) -> Result<WireArg, SqlAdapterError> {
    let scalar = arg.arg_type.scalar_type;
    let target = TemporalTarget::for_db_type(arg.arg_type.db_type.as_deref());

    match &arg.value {
        ArgValue::Null => Ok(WireArg::Null),
        ArgValue::Text(text) if scalar == ScalarType::BigInt => parse_bigint(text),
        ArgValue::Text(text) if scalar == ScalarType::DateTime => {
            let parsed = parse_datetime(text)?;
            Ok(WireArg::Text(target.format(&parsed)))
        }
        ArgValue::DateTime(value) => Ok(WireArg::Text(target.format(value))),
        ArgValue::Text(text) if scalar == ScalarType::Bytes => BASE64
            .decode(text)
            .map(|raw| WireArg::Bytes(Bytes::from(raw)))
            .map_err(|e| SqlAdapterError::ParameterError(format!("invalid base64 bytes: {e}"))),
        ArgValue::Array(items) if scalar == ScalarType::Bytes => byte_array(items),
        // Bytes clones share the backing storage, offset and length included.
        ArgValue::Bytes(view) => Ok(WireArg::Bytes(view.clone())),
        ArgValue::Bool(b) => Ok(WireArg::Bool(*b)),
        ArgValue::Int(i) => Ok(WireArg::Int(*i)),
        ArgValue::Float(f) => Ok(WireArg::Float(*f)),
        ArgValue::Text(text) => Ok(WireArg::Text(text.clone())),
        ArgValue::Array(items) => Ok(WireArg::Json(JsonValue::Array(items.clone()))),
        ArgValue::Json(value) => Ok(WireArg::Json(value.clone())),
    }
}

fn parse_bigint(text: &str) -> Result<WireArg, SqlAdapterError> {
    text.trim()
        .parse::<i128>()
        .map(WireArg::BigInt)
        .map_err(|e| SqlAdapterError::ParameterError(format!("invalid bigint {text:?}: {e}")))
}

fn byte_array(items: &[JsonValue]) -> Result<WireArg, SqlAdapterError> {
    let mut raw = Vec::with_capacity(items.len());
    for item in items {
        let byte = item
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .ok_or_else(|| {
                SqlAdapterError::ParameterError(format!("byte array element out of range: {item}"))
            })?;
        raw.push(byte);
    }
    Ok(WireArg::Bytes(Bytes::from(raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ArgType;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn null_passes_through_regardless_of_tag() {
        let arg = Arg::typed(ArgValue::Null, ScalarType::BigInt);
        assert_eq!(encode_arg(&arg).unwrap(), WireArg::Null);
    }

    #[test]
    fn bigint_text_covers_unsigned_range() {
        let arg = Arg::typed("18446744073709551615", ScalarType::BigInt);
        assert_eq!(
            encode_arg(&arg).unwrap(),
            WireArg::BigInt(i128::from(u64::MAX))
        );
        let bad = Arg::typed("12ab", ScalarType::BigInt);
        assert!(matches!(
            encode_arg(&bad),
            Err(SqlAdapterError::ParameterError(_))
        ));
    }

    #[test]
    fn datetime_text_follows_db_type() {
        let ty = ArgType::new(ScalarType::DateTime).with_db_type("DATE");
        let arg = Arg::new("2024-02-29T23:59:59.500Z", ty);
        assert_eq!(encode_arg(&arg).unwrap(), WireArg::Text("2024-02-29".into()));

        let ty = ArgType::new(ScalarType::DateTime).with_db_type("TIME");
        let arg = Arg::new("2024-02-29T23:59:59.500Z", ty);
        assert_eq!(encode_arg(&arg).unwrap(), WireArg::Text("23:59:59.500".into()));
    }

    #[test]
    fn native_datetime_defaults_to_full_form() {
        let value = Utc.with_ymd_and_hms(2001, 2, 3, 4, 5, 6).unwrap();
        let arg = Arg::untyped(value);
        assert_eq!(
            encode_arg(&arg).unwrap(),
            WireArg::Text("2001-02-03 04:05:06".into())
        );
    }

    #[test]
    fn base64_text_becomes_bytes() {
        let arg = Arg::typed("AQID", ScalarType::Bytes);
        assert_eq!(
            encode_arg(&arg).unwrap(),
            WireArg::Bytes(Bytes::from_static(&[1, 2, 3]))
        );
        let unpadded = Arg::typed("AQ", ScalarType::Bytes);
        assert_eq!(
            encode_arg(&unpadded).unwrap(),
            WireArg::Bytes(Bytes::from_static(&[1]))
        );
    }

    #[test]
    fn byte_arrays_need_a_bytes_tag() {
        let tagged = Arg::typed(ArgValue::Array(vec![json!(0), json!(255)]), ScalarType::Bytes);
        assert_eq!(
            encode_arg(&tagged).unwrap(),
            WireArg::Bytes(Bytes::from_static(&[0, 255]))
        );

        let untagged = Arg::untyped(ArgValue::Array(vec![json!(0), json!(255)]));
        assert_eq!(
            encode_arg(&untagged).unwrap(),
            WireArg::Json(json!([0, 255]))
        );

        let overflow = Arg::typed(ArgValue::Array(vec![json!(256)]), ScalarType::Bytes);
        assert!(encode_arg(&overflow).is_err());
    }

    #[test]
    fn byte_views_keep_their_window() {
        let backing = Bytes::from_static(b"abcdef");
        let view = backing.slice(2..4);
        let encoded = encode_arg(&Arg::untyped(ArgValue::Bytes(view.clone()))).unwrap();
        let WireArg::Bytes(out) = encoded else {
            panic!("expected bytes");
        };
        assert_eq!(out.as_ref(), b"cd");
        assert_eq!(out.as_ptr(), view.as_ptr());
        assert_eq!(backing.as_ref(), b"abcdef");
    }

    #[test]
    fn plain_text_is_untouched() {
        let arg = Arg::typed("AQID", ScalarType::String);
        assert_eq!(encode_arg(&arg).unwrap(), WireArg::Text("AQID".into()));
    }

    #[test]
    fn convert_reports_failing_position() {
        let args = vec![
            Arg::untyped(1_i64),
            Arg::typed("not-a-date", ScalarType::DateTime),
        ];
        let err = Params::convert(&args).unwrap_err();
        assert!(err.to_string().contains("argument 1"));
    }
}
