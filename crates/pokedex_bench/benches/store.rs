//! Record store benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pokedex_bench::generate_records;
use pokedex_store::{FileStore, InMemoryStore, RecordStore};
use tempfile::tempdir;

/// Benchmark staging and committing rows in memory.
fn bench_memory_save(c: &mut Criterion) {
    let mut group = c.benchmark_group("memory_save");

    for count in [50, 500].iter() {
        let records = generate_records(*count);
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &records, |b, records| {
            b.iter_with_setup(InMemoryStore::new, |store| {
                for record in records {
                    store.upsert(record.clone()).unwrap();
                }
                store.save().unwrap();
                black_box(store);
            });
        });
    }
    group.finish();
}

/// Benchmark snapshot writes of the file store.
fn bench_file_save(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_save");
    group.sample_size(20);

    for count in [50, 500].iter() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(&dir.path().join("bench.cbor")).unwrap();
        let records = generate_records(*count);

        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &records, |b, records| {
            // Unchanged snapshots are not rewritten, so flip a flag each pass.
            let mut favorite = false;
            b.iter(|| {
                favorite = !favorite;
                for record in records {
                    store.upsert(record.clone().with_favorite(favorite)).unwrap();
                }
                store.save().unwrap();
            });
        });
    }
    group.finish();
}

/// Benchmark reopening a persisted snapshot.
fn bench_file_open(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bench.cbor");
    {
        let store = FileStore::open(&path).unwrap();
        for record in generate_records(500) {
            store.upsert(record).unwrap();
        }
        store.save().unwrap();
    }

    c.bench_function("file_open_500", |b| {
        b.iter(|| {
            let store = FileStore::open(black_box(&path)).unwrap();
            black_box(store.count().unwrap());
        });
    });
}

criterion_group!(benches, bench_memory_save, bench_file_save, bench_file_open);
criterion_main!(benches);
