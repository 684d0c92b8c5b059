use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hashbrown::HashMap;
use parking_lot::RwLock;
use shmap::hash::{f64_hash, int_hash, string_hash};
use shmap::ShardMap;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const KEY_COUNT: usize = 100_000;
const NUM_THREADS: usize = 8;
const OPS_PER_THREAD: usize = 10_000;

fn gen_keys(n: usize) -> Arc<Vec<String>> {
    Arc::new((0..n).map(|i| format!("key-{}", i)).collect())
}

/// Minimal surface shared by the sharded map and the single-lock baseline.
trait Store: Send + Sync + 'static {
    fn get(&self, key: &String) -> bool;
    fn set(&self, key: String, value: usize);
}

impl Store for ShardMap<String, usize> {
    fn get(&self, key: &String) -> bool {
        ShardMap::get(self, key).is_some()
    }

    fn set(&self, key: String, value: usize) {
        self.insert(key, value);
    }
}

struct SingleLock(RwLock<HashMap<String, usize>>);

impl Store for SingleLock {
    fn get(&self, key: &String) -> bool {
        self.0.read().get(key).is_some()
    }

    fn set(&self, key: String, value: usize) {
        self.0.write().insert(key, value);
    }
}

fn prefill<S: Store>(store: S, keys: &[String]) -> Arc<S> {
    for (i, key) in keys.iter().enumerate() {
        store.set(key.clone(), i);
    }
    Arc::new(store)
}

/// Run `NUM_THREADS` threads doing `OPS_PER_THREAD` operations each, of
/// which `write_pct` percent are writes. Keys are drawn with a per-thread
/// multiplicative stride so threads do not walk the same sequence.
fn run_mixed<S: Store>(store: &Arc<S>, keys: &Arc<Vec<String>>, write_pct: usize) -> Duration {
    let start = Instant::now();
    let mut handles = vec![];

    for thread_id in 0..NUM_THREADS {
        let store = Arc::clone(store);
        let keys = Arc::clone(keys);
        handles.push(thread::spawn(move || {
            for i in 0..OPS_PER_THREAD {
                let idx = (thread_id * 7919 + i * 104_729) % keys.len();
                if i % 100 < write_pct {
                    store.set(keys[idx].clone(), i);
                } else {
                    black_box(store.get(&keys[idx]));
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
    start.elapsed()
}

fn bench_hash_functions(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash");
    let s = "benchmark-test-key-with-decent-length";

    group.bench_function("string", |b| b.iter(|| string_hash(black_box(s))));
    group.bench_function("int", |b| {
        b.iter(|| int_hash(black_box(1_234_567_890_123_456)))
    });
    group.bench_function("float", |b| b.iter(|| f64_hash(black_box(123.456789))));

    group.finish();
}

fn bench_workloads(c: &mut Criterion) {
    let keys = gen_keys(KEY_COUNT);

    for (name, write_pct) in [("read_mostly", 10), ("write_heavy", 50)] {
        let mut group = c.benchmark_group(name);

        let single = prefill(SingleLock(RwLock::new(HashMap::new())), &keys);
        group.bench_function("single_lock_hashmap", |b| {
            b.iter_custom(|iters| (0..iters).map(|_| run_mixed(&single, &keys, write_pct)).sum())
        });

        let sharded = prefill(ShardMap::<String, usize>::with_shards(128), &keys);
        group.bench_function("shmap", |b| {
            b.iter_custom(|iters| (0..iters).map(|_| run_mixed(&sharded, &keys, write_pct)).sum())
        });

        group.finish();
    }
}

fn bench_shard_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("shard_scaling");
    let keys = gen_keys(KEY_COUNT);

    for shard_count in [1, 16, 64, 128, 256, 512] {
        let map = prefill(ShardMap::<String, usize>::with_shards(shard_count), &keys);
        group.bench_with_input(
            BenchmarkId::new("shmap", shard_count),
            &shard_count,
            |b, _| b.iter_custom(|iters| (0..iters).map(|_| run_mixed(&map, &keys, 10)).sum()),
        );
    }

    group.finish();
}

fn bench_high_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("high_contention");
    // Every thread hits one key: the worst case for sharding.
    let hot = gen_keys(1);

    let single = prefill(SingleLock(RwLock::new(HashMap::new())), &hot);
    group.bench_function("single_lock_hashmap", |b| {
        b.iter_custom(|iters| (0..iters).map(|_| run_mixed(&single, &hot, 10)).sum())
    });

    let sharded = prefill(ShardMap::<String, usize>::with_shards(128), &hot);
    group.bench_function("shmap", |b| {
        b.iter_custom(|iters| (0..iters).map(|_| run_mixed(&sharded, &hot, 10)).sum())
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_hash_functions,
    bench_workloads,
    bench_shard_scaling,
    bench_high_contention
);
criterion_main!(benches);
