use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use roster_cache::{CacheStore, KeyPattern, MemoryStore, Namespace};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::runtime::Runtime;

/// Payload roughly the size of a list response with N students
fn payload(students: usize) -> String {
    let rows: Vec<String> = (0..students)
        .map(|i| {
            format!(
                r#"{{"id":"{i}","name":"Student {i}","email":"s{i}@school.test","grade":"5","age":10}}"#
            )
        })
        .collect();
    format!("[{}]", rows.join(","))
}

/// Benchmark: get (hit)
fn bench_get_hit(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let store = MemoryStore::new();
    let key = Namespace::new("students").unwrap().key("/api/students");

    rt.block_on(async {
        store.set(key.as_str(), &payload(100), None).await.unwrap();
    });

    c.bench_function("memory_get_hit", |b| {
        b.to_async(&rt).iter(|| async {
            let result = store.get(key.as_str()).await;
            std::hint::black_box(result)
        });
    });
}

/// Benchmark: set with distinct keys
fn bench_set(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let store = Arc::new(MemoryStore::new());
    let value = Arc::new(payload(100));
    let counter = Arc::new(AtomicU64::new(0));

    c.bench_function("memory_set", |b| {
        b.to_async(&rt).iter(|| {
            let store = Arc::clone(&store);
            let value = Arc::clone(&value);
            let counter = Arc::clone(&counter);
            async move {
                let n = counter.fetch_add(1, Ordering::Relaxed);
                let key = format!("students:/api/students/{n}");
                store.set(&key, &value, None).await.unwrap();
            }
        });
    });
}

/// Benchmark: list_keys over stores of different sizes
fn bench_list_keys(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let pattern = KeyPattern::new("students:/api/students/42*").unwrap();

    let mut group = c.benchmark_group("memory_list_keys");
    for size in [100usize, 1_000, 10_000] {
        let store = MemoryStore::new();
        rt.block_on(async {
            for i in 0..size {
                let key = format!("students:/api/students/{i}");
                store.set(&key, "{}", None).await.unwrap();
            }
        });

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &store, |b, store| {
            b.to_async(&rt).iter(|| async {
                let keys = store.list_keys(&pattern).await;
                std::hint::black_box(keys)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_get_hit, bench_set, bench_list_keys);
criterion_main!(benches);
