use std::sync::Arc;

use bytes::Bytes;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use serde_json::json;
use tidbcloud_driver_adapter::codec::{
    WireArg, encode_arg, format_date, format_date_time, format_time, parse_datetime,
};
use tidbcloud_driver_adapter::prelude::*;
use tidbcloud_driver_adapter::test_utils::{CannedResult, MemoryConnection, MemoryDatabase};
use tokio::runtime::Runtime;

fn adapter_over(db: &Arc<MemoryDatabase>) -> Adapter {
    let connection = MemoryConnection::new(Arc::clone(db), ClientConfig::default());
    Adapter::new(Arc::new(connection), AdapterOptions::default())
}

fn datetime_arg(value: impl Into<ArgValue>, db_type: &str) -> Arg {
    Arg::new(value, ArgType::new(ScalarType::DateTime).with_db_type(db_type))
}

#[test]
fn temporal_forms_in_utc() {
    let at = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 58).unwrap()
        + chrono::Duration::milliseconds(7);

    assert_eq!(format_date_time(&at), "2023-12-31 23:59:58.007");
    assert_eq!(format_date(&at), "2023-12-31");
    assert_eq!(format_time(&at), "23:59:58.007");

    let whole = Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap();
    assert_eq!(format_date_time(&whole), "2023-01-02 03:04:05");
    assert_eq!(format_time(&whole), "03:04:05");
}

#[test]
fn offsets_are_normalized_to_utc() {
    let parsed = parse_datetime("2024-06-01T01:30:00+02:00").unwrap();
    assert_eq!(format_date_time(&parsed), "2024-05-31 23:30:00");
    assert_eq!(format_date(&parsed), "2024-05-31");
}

#[test]
fn datetime_value_uses_declared_column_type() {
    let at = Utc.with_ymd_and_hms(2022, 8, 9, 10, 11, 12).unwrap();
    let cases = [
        ("TIME", "10:11:12"),
        ("TIME2", "10:11:12"),
        ("DATE", "2022-08-09"),
        ("NEWDATE", "2022-08-09"),
        ("DATETIME", "2022-08-09 10:11:12"),
        ("TIMESTAMP", "2022-08-09 10:11:12"),
    ];
    for (db_type, expected) in cases {
        assert_eq!(
            encode_arg(&datetime_arg(at, db_type)).unwrap(),
            WireArg::Text(expected.into()),
            "db type {db_type}"
        );
    }
    // No declared type at all: full datetime.
    assert_eq!(
        encode_arg(&Arg::untyped(at)).unwrap(),
        WireArg::Text("2022-08-09 10:11:12".into())
    );
}

fn encoded_text(arg: &Arg) -> String {
    match encode_arg(arg).unwrap() {
        WireArg::Text(text) => text,
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn temporal_encodings_read_back_to_the_same_components() {
    let samples = [
        Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).unwrap()
            + chrono::Duration::milliseconds(999),
        Utc.with_ymd_and_hms(2030, 7, 4, 9, 8, 7).unwrap() + chrono::Duration::milliseconds(40),
    ];
    for at in samples {
        let millis = at.nanosecond() / 1_000_000;

        let date = encoded_text(&datetime_arg(at, "DATE"));
        let parsed = NaiveDate::parse_from_str(&date, "%Y-%m-%d").unwrap();
        assert_eq!(
            (parsed.year(), parsed.month(), parsed.day()),
            (at.year(), at.month(), at.day())
        );

        let time = encoded_text(&datetime_arg(at, "TIME"));
        let parsed = NaiveTime::parse_from_str(&time, "%H:%M:%S%.f").unwrap();
        assert_eq!(
            (parsed.hour(), parsed.minute(), parsed.second(), parsed.nanosecond() / 1_000_000),
            (at.hour(), at.minute(), at.second(), millis)
        );

        let full = encoded_text(&datetime_arg(at, "DATETIME"));
        let parsed = NaiveDateTime::parse_from_str(&full, "%Y-%m-%d %H:%M:%S%.f")
            .unwrap()
            .and_utc();
        assert_eq!(parsed, at);
        assert_eq!(parse_datetime(&full).unwrap(), at);

        // Whole seconds carry no fraction at all.
        if millis == 0 {
            assert!(!time.contains('.'), "{time}");
            assert!(!full.contains('.'), "{full}");
        } else {
            assert_eq!(full.rsplit('.').next().map(str::len), Some(3), "{full}");
        }
    }
}

#[test]
fn bytes_arguments() {
    let b64 = Arg::typed("3q2+7w==", ScalarType::Bytes);
    assert_eq!(
        encode_arg(&b64).unwrap(),
        WireArg::Bytes(Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]))
    );
    let unpadded = Arg::typed("3q2+7w", ScalarType::Bytes);
    assert_eq!(encode_arg(&unpadded).unwrap(), encode_arg(&b64).unwrap());

    let array = Arg::typed(ArgValue::Array(vec![json!(0), json!(127), json!(255)]), ScalarType::Bytes);
    assert_eq!(
        encode_arg(&array).unwrap(),
        WireArg::Bytes(Bytes::from_static(&[0, 127, 255]))
    );

    let out_of_range = Arg::typed(ArgValue::Array(vec![json!(256)]), ScalarType::Bytes);
    assert!(matches!(
        encode_arg(&out_of_range),
        Err(SqlAdapterError::ParameterError(_))
    ));

    // A view over part of a larger buffer keeps exactly its window.
    let backing = Bytes::from_static(b"0123456789");
    let view = Arg::untyped(ArgValue::Bytes(backing.slice(2..5)));
    assert_eq!(
        encode_arg(&view).unwrap(),
        WireArg::Bytes(Bytes::from_static(b"234"))
    );
}

#[test]
fn untagged_values_pass_through() {
    assert_eq!(encode_arg(&Arg::untyped(7_i64)).unwrap(), WireArg::Int(7));
    assert_eq!(encode_arg(&Arg::untyped(true)).unwrap(), WireArg::Bool(true));
    assert_eq!(
        encode_arg(&Arg::untyped("12345678901234567890")).unwrap(),
        WireArg::Text("12345678901234567890".into())
    );
    assert_eq!(
        encode_arg(&Arg::untyped(ArgValue::Array(vec![json!(1), json!("a")]))).unwrap(),
        WireArg::Json(json!([1, "a"]))
    );
    assert_eq!(
        encode_arg(&Arg::typed(ArgValue::Null, ScalarType::Bytes)).unwrap(),
        WireArg::Null
    );
}

#[test]
fn encoded_args_reach_the_client_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let db = MemoryDatabase::new();
        db.push_result(CannedResult::default());
        let adapter = adapter_over(&db);

        let query = Query::new_without_args("UPDATE t SET a = ?, b = ?, c = ?, d = ?")
            .arg(Arg::typed("9223372036854775808", ScalarType::BigInt))
            .arg(datetime_arg("2020-02-02 02:02:02.250", "DATETIME"))
            .arg(Arg::typed("AAE=", ScalarType::Bytes))
            .arg(Arg::untyped(ArgValue::Null));
        adapter.execute_raw(&query).await?;

        let statements = db.statements();
        assert_eq!(statements.len(), 1);
        assert_eq!(
            statements[0].args,
            vec![
                WireArg::BigInt(9_223_372_036_854_775_808),
                WireArg::Text("2020-02-02 02:02:02.250".into()),
                WireArg::Bytes(Bytes::from_static(&[0, 1])),
                WireArg::Null,
            ]
        );
        Ok::<(), SqlAdapterError>(())
    })?;
    Ok(())
}

#[test]
fn bad_argument_is_reported_with_its_position() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let db = MemoryDatabase::new();
        let adapter = adapter_over(&db);
        let query = Query::new_without_args("SELECT ?, ?")
            .arg(Arg::untyped(1_i64))
            .arg(Arg::typed("yesterday", ScalarType::DateTime));

        match adapter.query_raw(&query).await {
            Err(SqlAdapterError::ParameterError(msg)) => assert!(msg.starts_with("argument 1:")),
            other => panic!("expected ParameterError, got {other:?}"),
        }
        // Nothing was sent.
        assert!(db.statements().is_empty());
    });
    Ok(())
}
