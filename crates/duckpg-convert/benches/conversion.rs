//! Benchmark for conversion operations.
//!
//! Run with: cargo bench --bench conversion

use std::hint::black_box;
use std::sync::Arc;

use arrow_array::builder::{Int32Builder, ListBuilder};
use arrow_array::{ArrayRef, Int64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use criterion::{Criterion, criterion_group, criterion_main};
use duckpg_convert::catalog::InMemoryCatalog;
use duckpg_convert::source::LogicalType;
use duckpg_convert::{DataExtractor, TypeConverter, TypeRegistry, batch_to_rows};

fn nested_type() -> LogicalType {
    LogicalType::structure([
        ("id", LogicalType::bigint()),
        (
            "attrs",
            LogicalType::map(LogicalType::varchar(), LogicalType::list(LogicalType::double())),
        ),
        ("price", LogicalType::decimal(18, 2)),
    ])
}

fn benchmark_convert(c: &mut Criterion) {
    let registry = TypeRegistry::new(Arc::new(InMemoryCatalog::new()));
    let converter = TypeConverter::new(&registry);
    let ty = nested_type();

    c.bench_function("convert_nested_interned", |b| {
        b.iter(|| converter.convert(Some("row"), black_box(&ty)).unwrap());
    });
}

fn sample_batch(rows: usize) -> RecordBatch {
    let ids = Int64Array::from_iter_values(0..rows as i64);
    let names = StringArray::from_iter_values((0..rows).map(|i| format!("name-{i}")));
    let mut lists = ListBuilder::new(Int32Builder::new());
    for i in 0..rows {
        lists.values().append_slice(&[i as i32, 1, 2]);
        lists.append(true);
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, true),
        Field::new_list("values", Field::new("item", DataType::Int32, true), true),
    ]));
    let columns: Vec<ArrayRef> = vec![Arc::new(ids), Arc::new(names), Arc::new(lists.finish())];
    RecordBatch::try_new(schema, columns).unwrap()
}

fn benchmark_extract(c: &mut Criterion) {
    let registry = TypeRegistry::new(Arc::new(InMemoryCatalog::new()));
    let extractor = DataExtractor::new(TypeConverter::new(&registry));
    let batch = sample_batch(1024);

    c.bench_function("batch_to_rows_1024", |b| {
        b.iter(|| batch_to_rows(&extractor, black_box(&batch)).unwrap());
    });
}

criterion_group!(benches, benchmark_convert, benchmark_extract);
criterion_main!(benches);
