use std::num::NonZeroUsize;

use weighted_lru::{DeepSizeOf, DeepSizeWeigher, WeightedLru};

/// Example demonstrating how a byte budget and an entry budget interact
/// when cached values vary wildly in size.

#[derive(Clone, Debug, PartialEq, DeepSizeOf)]
struct UserProfile {
	name: String,
	avatar: Vec<u8>,
}

fn profile(id: u64, avatar_bytes: usize) -> UserProfile {
	UserProfile {
		name: format!("user-{id}"),
		avatar: vec![0; avatar_bytes],
	}
}

fn main() {
	// 4 KB of profiles, never more than 8 of them
	let count = NonZeroUsize::new(8).expect("non-zero");
	let mut cache: WeightedLru<u64, UserProfile, _> =
		WeightedLru::with_count_limit(DeepSizeWeigher, 4096, count).expect("non-zero weight limit");

	println!("Inserting small profiles...");
	for id in 0..10 {
		cache.insert(id, profile(id, 16));
	}
	println!("  entries: {}, weight: {} bytes", cache.len(), cache.weight());

	println!("\nInserting one large profile...");
	cache.insert(100, profile(100, 3000));
	println!("  entries: {}, weight: {} bytes", cache.len(), cache.weight());

	println!("\nRemaining keys (most recent first):");
	for (id, user) in cache.iter() {
		println!("  {id}: {} ({} bytes)", user.name, cache.entry_weight(id).unwrap_or(0));
	}

	println!("\nInserting a profile larger than the whole budget...");
	cache.insert(200, profile(200, 8192));
	println!("  present: {}, entries: {}", cache.contains(&200), cache.len());

	let metrics = cache.metrics();
	println!("\nCache metrics:");
	println!("  count evictions:  {}", metrics.count_evictions);
	println!("  weight evictions: {}", metrics.weight_evictions);
	println!("  utilization:      {:.1}%", metrics.utilization() * 100.0);
}
