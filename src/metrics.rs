//! Cache performance metrics.

/// Snapshot of a cache's counters.
///
/// Counters are reset by [`WeightedLru::clear`](crate::WeightedLru::clear).
///
/// # Example
///
/// ```
/// use weighted_lru::{UnitWeigher, WeightedLru};
///
/// let mut cache = WeightedLru::new(UnitWeigher, 2)?;
/// cache.insert("a", 1);
/// cache.insert("b", 2);
/// cache.insert("c", 3);
/// cache.get("a");
///
/// let metrics = cache.metrics();
/// assert_eq!(metrics.inserts, 3);
/// assert_eq!(metrics.weight_evictions, 1);
/// assert_eq!(metrics.misses, 1);
/// # Ok::<(), weighted_lru::ConfigError>(())
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheMetrics {
	/// Number of lookups that found their key.
	pub hits: u64,
	/// Number of lookups that did not find their key.
	pub misses: u64,
	/// Number of new entries inserted.
	pub inserts: u64,
	/// Number of existing entries overwritten.
	pub updates: u64,
	/// Number of entries removed on request (`remove` and `pop_lru`).
	pub removals: u64,
	/// Number of entries evicted because the count limit overflowed.
	pub count_evictions: u64,
	/// Number of entries evicted because the weight limit overflowed.
	pub weight_evictions: u64,
	/// Current total weight across all entries.
	pub current_weight: u64,
	/// Maximum total weight.
	pub weight_limit: u64,
	/// Current number of entries.
	pub entry_count: usize,
}

impl CacheMetrics {
	/// Hit rate as a ratio between 0.0 and 1.0, or 0.0 without any lookups.
	pub fn hit_rate(&self) -> f64 {
		let total = self.total_accesses();
		if total == 0 {
			0.0
		} else {
			self.hits as f64 / total as f64
		}
	}

	/// Fraction of the weight limit currently in use.
	pub fn utilization(&self) -> f64 {
		if self.weight_limit == 0 {
			0.0
		} else {
			self.current_weight as f64 / self.weight_limit as f64
		}
	}

	/// Total number of lookups (hits + misses).
	pub fn total_accesses(&self) -> u64 {
		self.hits + self.misses
	}

	/// Total number of write operations (inserts + updates).
	pub fn total_writes(&self) -> u64 {
		self.inserts + self.updates
	}

	/// Total number of evictions, whichever limit caused them.
	pub fn evictions(&self) -> u64 {
		self.count_evictions + self.weight_evictions
	}
}
