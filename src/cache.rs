use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;

use log::{debug, trace, warn};

use crate::error::ConfigError;
use crate::listener::EvictionListener;
use crate::metrics::CacheMetrics;
use crate::store::LruStore;
use crate::weigher::Weigher;

/// A value together with the weight recorded when it was inserted.
struct Weighted<V> {
	value: V,
	weight: u64,
}

/// Weight bookkeeping owned by the store as its eviction listener.
///
/// Count-limit evictions happen inside the store, so the running total has
/// to live where the store can reach it.
#[derive(Default)]
struct WeightTracker {
	/// Sum of the weights of all entries. Wider than `u64` so an insert can
	/// overshoot before the eviction loop brings it back under the limit.
	total: u128,
	/// Metrics: count-limit evictions
	count_evictions: u64,
}

impl<K, V> EvictionListener<K, Weighted<V>> for WeightTracker {
	fn on_evict(&mut self, _key: &K, entry: &Weighted<V>) {
		self.total -= u128::from(entry.weight);
		self.count_evictions += 1;
		trace!("count limit evicted entry of weight {}", entry.weight);
	}
}

/// LRU cache bounded by total entry weight and, optionally, entry count.
///
/// Every entry is weighed once by the cache's [`Weigher`] when it is inserted.
/// After each insertion the cache evicts least-recently-used entries until
/// the total weight fits within the weight limit. An independent count limit
/// is enforced by the underlying [`LruStore`]; entries it evicts are
/// subtracted from the total as well.
///
/// # Invariants
///
/// After every public call returns:
/// - [`weight`](Self::weight) equals the sum of the weights of the present entries
/// - `weight() <= weight_limit()`
/// - `len() <= count_limit()` when a count limit is set
///
/// An entry that alone outweighs the limit is evicted by the very insert that
/// added it.
///
/// # Example
///
/// ```
/// use weighted_lru::WeightedLru;
///
/// let mut cache: WeightedLru<u32, Vec<char>, _> =
/// 	WeightedLru::new(|_: &u32, v: &Vec<char>| v.len() as u64, 8)?;
///
/// cache.insert(1, vec!['A', 'B', 'C']);
/// cache.insert(2, vec!['D', 'E', 'F']);
/// cache.insert(3, vec!['G', 'H']);
/// assert_eq!(cache.weight(), 8);
///
/// // Pushes the total to 12, evicting keys 1 and 2
/// cache.insert(4, vec!['I', 'J', 'K', 'L']);
/// assert_eq!(cache.weight(), 6);
/// assert!(!cache.contains(&1));
/// assert!(!cache.contains(&2));
/// # Ok::<(), weighted_lru::ConfigError>(())
/// ```
///
/// # Thread Safety
///
/// All mutating methods, including [`get`](Self::get), take `&mut self`.
/// Share a cache between threads by wrapping it in a mutex.
pub struct WeightedLru<K, V, W> {
	/// Recency-ordered storage; its listener carries the running total
	store: LruStore<K, Weighted<V>, WeightTracker>,
	/// Computes entry weights
	weigher: W,
	/// Maximum total weight
	weight_limit: u64,
	/// Metrics: successful lookups
	hits: u64,
	/// Metrics: failed lookups
	misses: u64,
	/// Metrics: new inserts
	inserts: u64,
	/// Metrics: updates (replaced existing key)
	updates: u64,
	/// Metrics: explicit removals
	removals: u64,
	/// Metrics: weight-limit evictions
	weight_evictions: u64,
}

impl<K, V, W> WeightedLru<K, V, W>
where
	K: Hash + Eq + Clone,
	W: Weigher<K, V>,
{
	/// Create a cache bounded only by total weight.
	///
	/// Fails if `weight_limit` is zero.
	pub fn new(weigher: W, weight_limit: u64) -> Result<Self, ConfigError> {
		Self::with_limits(weigher, weight_limit, None)
	}

	/// Create a cache bounded by total weight and entry count.
	pub fn with_count_limit(
		weigher: W,
		weight_limit: u64,
		count_limit: NonZeroUsize,
	) -> Result<Self, ConfigError> {
		Self::with_limits(weigher, weight_limit, Some(count_limit))
	}

	/// Create a cache and populate it with `entries`.
	///
	/// Entries are inserted in order exactly as by [`insert`](Self::insert):
	/// they count towards the total weight, and the oldest are evicted if the
	/// entries do not fit within the limits.
	pub fn with_entries<I>(
		weigher: W,
		weight_limit: u64,
		count_limit: Option<NonZeroUsize>,
		entries: I,
	) -> Result<Self, ConfigError>
	where
		I: IntoIterator<Item = (K, V)>,
	{
		let mut cache = Self::with_limits(weigher, weight_limit, count_limit)?;
		for (key, value) in entries {
			cache.insert(key, value);
		}
		Ok(cache)
	}

	pub(crate) fn with_limits(
		weigher: W,
		weight_limit: u64,
		count_limit: Option<NonZeroUsize>,
	) -> Result<Self, ConfigError> {
		if weight_limit == 0 {
			warn!("rejecting cache configuration with a zero weight limit");
			return Err(ConfigError::ZeroWeightLimit);
		}

		debug!("creating weighted LRU cache: weight_limit={weight_limit}, count_limit={count_limit:?}");

		Ok(Self {
			store: LruStore::with_listener(count_limit, WeightTracker::default()),
			weigher,
			weight_limit,
			hits: 0,
			misses: 0,
			inserts: 0,
			updates: 0,
			removals: 0,
			weight_evictions: 0,
		})
	}

	/// Insert a key-value pair and evict until the limits hold again.
	///
	/// Returns the previous value if the key existed. The new entry becomes
	/// most-recently-used, but is evicted immediately if its weight alone
	/// exceeds the weight limit.
	///
	/// The weigher runs before the cache is modified, so a panicking weigher
	/// leaves the cache unchanged.
	pub fn insert(&mut self, key: K, value: V) -> Option<V> {
		let weight = self.weigher.weigh(&key, &value);

		// New keys may push the store over its count limit; those evictions
		// are subtracted by the tracker before the put returns.
		let previous = self.store.put(key, Weighted { value, weight });

		let old_weight = previous.as_ref().map_or(0, |entry| entry.weight);
		let tracker = self.store.listener_mut();
		tracker.total = tracker.total - u128::from(old_weight) + u128::from(weight);

		if previous.is_some() {
			self.updates += 1;
		} else {
			self.inserts += 1;
		}

		self.evict_to_weight_limit();

		previous.map(|entry| entry.value)
	}

	/// Replace the whole content with `entries`.
	///
	/// Each supplied entry is weighed exactly once, before the current content
	/// is discarded. The count limit applies to the new content, and the
	/// least-recently-used entries are then evicted until the total weight
	/// fits within the weight limit.
	pub fn assign<I>(&mut self, entries: I)
	where
		I: IntoIterator<Item = (K, V)>,
	{
		let weighted: Vec<(K, Weighted<V>)> = entries
			.into_iter()
			.map(|(key, value)| {
				let weight = self.weigher.weigh(&key, &value);
				(key, Weighted { value, weight })
			})
			.collect();

		// Count-limit evictions during the bulk load subtract from this
		// provisional sum, so it must cover every supplied entry.
		self.store.listener_mut().total = weighted.iter().map(|(_, entry)| u128::from(entry.weight)).sum();
		self.store.replace_all(weighted);

		// Overwritten duplicates are not reported to the tracker; recount.
		let total: u128 = self.store.iter().map(|(_, entry)| u128::from(entry.weight)).sum();
		self.store.listener_mut().total = total;

		self.evict_to_weight_limit();
	}
}

impl<K, V, W> WeightedLru<K, V, W>
where
	K: Hash + Eq,
{
	/// Look up a value and promote it to most-recently-used.
	///
	/// Never evicts and never re-weighs the entry.
	pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		match self.store.get(key) {
			Some(entry) => {
				self.hits += 1;
				Some(&entry.value)
			}
			None => {
				self.misses += 1;
				None
			}
		}
	}

	/// Look up a value without changing its recency.
	pub fn peek<Q>(&self, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		self.store.peek(key).map(|entry| &entry.value)
	}

	/// Check if a key is present, without changing its recency.
	pub fn contains<Q>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		self.store.contains(key)
	}

	/// The weight recorded for a key when it was inserted.
	pub fn entry_weight<Q>(&self, key: &Q) -> Option<u64>
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		self.store.peek(key).map(|entry| entry.weight)
	}

	/// Remove a key, releasing its weight.
	pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		let entry = self.store.remove(key)?;
		self.store.listener_mut().total -= u128::from(entry.weight);
		self.removals += 1;
		Some(entry.value)
	}

	/// Remove the least-recently-used entry, releasing its weight.
	pub fn pop_lru(&mut self) -> Option<(K, V)> {
		let (key, entry) = self.take_lru()?;
		self.removals += 1;
		Some((key, entry.value))
	}

	fn take_lru(&mut self) -> Option<(K, Weighted<V>)> {
		let (key, entry) = self.store.pop_lru()?;
		self.store.listener_mut().total -= u128::from(entry.weight);
		Some((key, entry))
	}

	fn evict_to_weight_limit(&mut self) {
		while self.store.listener().total > u128::from(self.weight_limit) {
			let Some((_, entry)) = self.take_lru() else {
				break;
			};
			self.weight_evictions += 1;
			trace!("weight limit evicted entry of weight {}", entry.weight);
		}
	}
}

impl<K, V, W> WeightedLru<K, V, W> {
	/// Current total weight of all entries.
	pub fn weight(&self) -> u64 {
		// Bounded by `weight_limit` outside of a mutating call
		u64::try_from(self.store.listener().total).unwrap_or(u64::MAX)
	}

	/// Maximum total weight.
	pub fn weight_limit(&self) -> u64 {
		self.weight_limit
	}

	/// Maximum entry count, `None` when unbounded.
	pub fn count_limit(&self) -> Option<NonZeroUsize> {
		self.store.cap()
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.store.len()
	}

	/// Check if the cache is empty.
	pub fn is_empty(&self) -> bool {
		self.store.is_empty()
	}

	/// The least-recently-used entry, next in line for eviction.
	pub fn peek_lru(&self) -> Option<(&K, &V)> {
		self.store.peek_lru().map(|(key, entry)| (key, &entry.value))
	}

	/// Iterate entries from most- to least-recently-used.
	pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&K, &V)> + ExactSizeIterator + '_ {
		self.store.iter().map(|(key, entry)| (key, &entry.value))
	}

	/// The weigher this cache was built with.
	pub fn weigher(&self) -> &W {
		&self.weigher
	}

	/// Remove all entries and reset the metrics.
	pub fn clear(&mut self) {
		self.store.clear();
		*self.store.listener_mut() = WeightTracker::default();
		self.hits = 0;
		self.misses = 0;
		self.inserts = 0;
		self.updates = 0;
		self.removals = 0;
		self.weight_evictions = 0;
	}

	/// Get a snapshot of the cache's counters.
	pub fn metrics(&self) -> CacheMetrics {
		CacheMetrics {
			hits: self.hits,
			misses: self.misses,
			inserts: self.inserts,
			updates: self.updates,
			removals: self.removals,
			count_evictions: self.store.listener().count_evictions,
			weight_evictions: self.weight_evictions,
			current_weight: self.weight(),
			weight_limit: self.weight_limit,
			entry_count: self.store.len(),
		}
	}
}

impl<K, V, W> fmt::Debug for WeightedLru<K, V, W> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WeightedLru")
			.field("len", &self.len())
			.field("weight", &self.weight())
			.field("weight_limit", &self.weight_limit)
			.field("count_limit", &self.count_limit())
			.finish_non_exhaustive()
	}
}
