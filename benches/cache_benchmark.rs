use std::hint::black_box;
use std::num::NonZeroUsize;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use weighted_lru::{DeepSizeWeigher, WeightedLru};

fn byte_weigher(_key: &u64, value: &Vec<u8>) -> u64 {
	value.len() as u64
}

type BenchCache = WeightedLru<u64, Vec<u8>, fn(&u64, &Vec<u8>) -> u64>;

fn new_cache(weight_limit: u64) -> BenchCache {
	WeightedLru::new(byte_weigher as fn(&u64, &Vec<u8>) -> u64, weight_limit).expect("non-zero limit")
}

#[derive(Clone)]
struct BytesWeighter;

impl quick_cache::Weighter<u64, Vec<u8>> for BytesWeighter {
	fn weight(&self, _key: &u64, val: &Vec<u8>) -> u64 {
		val.len() as u64
	}
}

fn bench_insert(c: &mut Criterion) {
	let mut group = c.benchmark_group("insert");

	for size in [100, 1000, 10000] {
		group.throughput(Throughput::Elements(size as u64));
		group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
			b.iter(|| {
				let mut cache = new_cache(1024 * 1024);
				for i in 0..size {
					cache.insert(black_box(i), black_box(vec![0u8; 64]));
				}
			});
		});
	}

	group.finish();
}

fn bench_get_hit(c: &mut Criterion) {
	let mut cache = new_cache(1024 * 1024);

	// Pre-populate cache
	for i in 0..1000 {
		cache.insert(i, vec![0u8; 64]);
	}

	c.bench_function("get_hit", |b| {
		b.iter(|| {
			for i in 0..1000 {
				let _ = cache.get(&black_box(i));
			}
		});
	});
}

fn bench_get_vs_peek(c: &mut Criterion) {
	let mut cache = new_cache(1024 * 1024);

	for i in 0..100 {
		cache.insert(i, vec![0u8; 64]);
	}

	let mut group = c.benchmark_group("lookup_methods");

	group.bench_function("get", |b| {
		b.iter(|| {
			for i in 0..100 {
				let _ = cache.get(&black_box(i));
			}
		});
	});

	group.bench_function("peek", |b| {
		b.iter(|| {
			for i in 0..100 {
				let _ = cache.peek(&black_box(i));
			}
		});
	});

	group.finish();
}

fn bench_mixed_workload(c: &mut Criterion) {
	let mut cache = new_cache(1024 * 1024);

	// Pre-populate
	for i in 0..500 {
		cache.insert(i, vec![0u8; 64]);
	}

	c.bench_function("mixed_80_20", |b| {
		b.iter(|| {
			for i in 0..100 {
				if i % 5 == 0 {
					// 20% writes
					cache.insert(black_box(i), vec![0u8; 64]);
				} else {
					// 80% reads
					let _ = cache.get(&black_box(i % 500));
				}
			}
		});
	});
}

fn bench_weight_eviction_pressure(c: &mut Criterion) {
	c.bench_function("weight_eviction_pressure", |b| {
		b.iter(|| {
			// Small limit to trigger eviction on almost every insert
			let mut cache = new_cache(10240);
			for i in 0..1000 {
				cache.insert(black_box(i), vec![0u8; (i % 200) as usize + 1]);
			}
		});
	});
}

fn bench_count_eviction_pressure(c: &mut Criterion) {
	let count = NonZeroUsize::new(100).expect("non-zero");

	c.bench_function("count_eviction_pressure", |b| {
		b.iter(|| {
			let mut cache: BenchCache =
				WeightedLru::with_count_limit(byte_weigher as fn(&u64, &Vec<u8>) -> u64, u64::MAX, count).expect("non-zero limit");
			for i in 0..1000 {
				cache.insert(black_box(i), vec![0u8; 64]);
			}
		});
	});
}

fn bench_deep_size_weigher(c: &mut Criterion) {
	c.bench_function("deep_size_weigher", |b| {
		b.iter(|| {
			let mut cache: WeightedLru<u64, Vec<String>, _> =
				WeightedLru::new(DeepSizeWeigher, 64 * 1024).expect("non-zero limit");
			for i in 0..1000 {
				cache.insert(black_box(i), vec![String::from("value"); 8]);
			}
		});
	});
}

fn bench_assign(c: &mut Criterion) {
	let entries: Vec<(u64, Vec<u8>)> = (0..1000).map(|i| (i, vec![0u8; 64])).collect();

	c.bench_function("assign_1000", |b| {
		let mut cache = new_cache(32 * 1024);
		b.iter(|| {
			cache.assign(black_box(entries.clone()));
		});
	});
}

fn bench_hit_rate_zipf(c: &mut Criterion) {
	let mut cache = new_cache(32 * 64);

	// Simulate Zipf distribution: some keys are accessed much more frequently
	let zipf_keys: Vec<u64> = (0..100)
		.flat_map(|i| {
			let freq = 100 / (i + 1); // First key appears 100 times, second 50 times, etc.
			vec![i; freq as usize]
		})
		.collect();

	c.bench_function("zipf_distribution", |b| {
		b.iter(|| {
			for &key_id in &zipf_keys {
				if cache.get(&key_id).is_none() {
					cache.insert(key_id, vec![0u8; 64]);
				}
			}
		});
	});
}

// ============================================================================
// Comparison Benchmarks: weighted-lru vs quick_cache (unsync, weighted)
// ============================================================================

fn bench_comparison_eviction_pressure(c: &mut Criterion) {
	let mut group = c.benchmark_group("comparison/eviction_pressure");

	group.bench_function("weighted_lru", |b| {
		b.iter(|| {
			let mut cache = new_cache(10240);
			for i in 0..1000 {
				cache.insert(black_box(i), vec![0u8; 100]);
			}
		});
	});

	group.bench_function("quick_cache", |b| {
		b.iter(|| {
			let mut cache = quick_cache::unsync::Cache::with_weighter(100, 10240, BytesWeighter);
			for i in 0..1000u64 {
				cache.insert(black_box(i), vec![0u8; 100]);
			}
		});
	});

	group.finish();
}

criterion_group!(
	benches,
	bench_insert,
	bench_get_hit,
	bench_get_vs_peek,
	bench_mixed_workload,
	bench_weight_eviction_pressure,
	bench_count_eviction_pressure,
	bench_deep_size_weigher,
	bench_assign,
	bench_hit_rate_zipf,
	// Comparison benchmarks
	bench_comparison_eviction_pressure
);

criterion_main!(benches);
