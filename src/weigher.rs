use deepsize::DeepSizeOf;

/// Computes the weight of a cache entry.
///
/// The weight is an approximate resource cost (bytes, serialized length, ...)
/// that counts against the cache's weight limit. It is computed once when the
/// entry is inserted and recorded alongside the value, so later removals
/// subtract exactly what was added.
///
/// Zero-weight entries are allowed. They never trigger weight-based eviction
/// on their own and only leave the cache through the count limit, explicit
/// removal, or by aging out behind heavier entries.
///
/// Any `Fn(&K, &V) -> u64` closure is a weigher:
///
/// ```
/// use weighted_lru::WeightedLru;
///
/// let cache = WeightedLru::new(|_key: &u64, value: &String| value.len() as u64, 1024)?;
/// # let _: WeightedLru<u64, String, _> = cache;
/// # Ok::<(), weighted_lru::ConfigError>(())
/// ```
pub trait Weigher<K, V> {
	/// Returns the weight of the entry.
	fn weigh(&self, key: &K, value: &V) -> u64;
}

impl<K, V, F> Weigher<K, V> for F
where
	F: Fn(&K, &V) -> u64,
{
	#[inline]
	fn weigh(&self, key: &K, value: &V) -> u64 {
		self(key, value)
	}
}

/// Weighs every entry as one.
///
/// With this weigher the weight limit behaves like a count limit.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitWeigher;

impl<K, V> Weigher<K, V> for UnitWeigher {
	#[inline]
	fn weigh(&self, _key: &K, _value: &V) -> u64 {
		1
	}
}

/// Weighs entries by their approximate memory footprint.
///
/// The weight is the [`DeepSizeOf::deep_size_of`] of the key plus that of the
/// value: the inline size of both plus every heap allocation they own.
///
/// ```
/// use weighted_lru::{DeepSizeWeigher, Weigher};
///
/// let weight = DeepSizeWeigher.weigh(&1u64, &String::from("hello"));
/// assert!(weight >= 8 + 5);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DeepSizeWeigher;

impl<K, V> Weigher<K, V> for DeepSizeWeigher
where
	K: DeepSizeOf,
	V: DeepSizeOf,
{
	fn weigh(&self, key: &K, value: &V) -> u64 {
		(key.deep_size_of() + value.deep_size_of()) as u64
	}
}
