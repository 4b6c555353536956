//! Criterion measurements of the per-statement conversion cost: argument
//! encoding, hex decoding of binary cells, and a full `query_raw` round trip
//! against the in-memory endpoint so the adapter overhead is visible on its own.

use std::hint::black_box;
use std::sync::{Arc, LazyLock};

use bytes::Bytes;
use chrono::{TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use tidbcloud_driver_adapter::codec::{Params, hex_to_bytes};
use tidbcloud_driver_adapter::logging::NoopLog;
use tidbcloud_driver_adapter::prelude::*;
use tidbcloud_driver_adapter::test_utils::{CannedResult, MemoryConnection, MemoryDatabase};
use tokio::runtime::Runtime;

static TOKIO_RUNTIME: LazyLock<Runtime> =
    LazyLock::new(|| Runtime::new().expect("create tokio runtime"));

/// A mixed argument list similar to what an ORM insert carries.
fn sample_args() -> Vec<Arg> {
    let at = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
    vec![
        Arg::typed("18446744073709551615", ScalarType::BigInt),
        Arg::new(
            "2024-05-06T07:08:09.123Z",
            ArgType::new(ScalarType::DateTime).with_db_type("DATETIME"),
        ),
        Arg::new(at, ArgType::new(ScalarType::DateTime).with_db_type("DATE")),
        Arg::typed("3q2+7wABAgMEBQYHCAkKCwwNDg8=", ScalarType::Bytes),
        Arg::untyped(ArgValue::Bytes(Bytes::from_static(&[1, 2, 3, 4]))),
        Arg::untyped("plain text"),
        Arg::untyped(42_i64),
    ]
}

fn hex_blob(len: usize) -> String {
    (0..len).map(|i| format!("{:02x}", i % 256)).collect()
}

fn benchmark_encode(c: &mut Criterion) {
    let args = sample_args();
    let mut group = c.benchmark_group("encode_args");
    group.throughput(Throughput::Elements(args.len() as u64));
    group.bench_function("mixed", |b| {
        b.iter(|| Params::convert(black_box(&args)).expect("encode"));
    });
    group.finish();
}

fn benchmark_hex(c: &mut Criterion) {
    let mut group = c.benchmark_group("hex_to_bytes");
    for len in [16_usize, 1024, 64 * 1024] {
        let blob = hex_blob(len);
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &blob, |b, blob| {
            b.iter(|| hex_to_bytes(black_box(blob)).expect("decode"));
        });
    }
    group.finish();
}

fn benchmark_query_raw(c: &mut Criterion) {
    let runtime = &*TOKIO_RUNTIME;
    let db = MemoryDatabase::new();
    let options = AdapterOptionsBuilder::new(ContractVersion::Direct)
        .logger(Arc::new(NoopLog))
        .finish();
    let adapter = Adapter::new(
        Arc::new(MemoryConnection::new(Arc::clone(&db), ClientConfig::default())),
        options,
    );
    let query = Query::new_without_args("SELECT id, payload FROM blobs");
    let canned = CannedResult {
        types: vec![("id".into(), "BIGINT".into()), ("payload".into(), "BLOB".into())],
        rows: (0..100)
            .map(|i| vec![Some(i.to_string()), Some(hex_blob(64))])
            .collect(),
        ..CannedResult::default()
    };

    let mut group = c.benchmark_group("query_raw");
    group.throughput(Throughput::Elements(100));
    group.bench_function("100_rows_with_blobs", |b| {
        b.iter(|| {
            db.clear_statements();
            db.push_result(canned.clone());
            let rs = runtime
                .block_on(adapter.query_raw(&query))
                .expect("query_raw");
            black_box(rs);
        });
    });
    group.finish();
}

criterion_group!(benches, benchmark_encode, benchmark_hex, benchmark_query_raw);
criterion_main!(benches);
