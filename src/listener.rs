//! Eviction callbacks for [`LruStore`](crate::LruStore).

/// Receives every entry the store evicts on its own because the count limit
/// overflowed.
///
/// The listener is owned by the store and invoked once per evicted entry,
/// after the entry has been unlinked but before it is dropped. Explicit
/// removals (`remove`, `pop_lru`, `clear`) are not reported.
///
/// # Example
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use weighted_lru::{FnListener, LruStore};
///
/// let mut evicted = Vec::new();
/// let mut store: LruStore<u32, &str, _> = LruStore::with_listener(
/// 	NonZeroUsize::new(1),
/// 	FnListener(|key: &u32, _value: &&str| evicted.push(*key)),
/// );
///
/// store.put(1, "one");
/// store.put(2, "two");
/// drop(store);
///
/// assert_eq!(evicted, vec![1]);
/// ```
pub trait EvictionListener<K, V> {
	/// Called with the entry that is being evicted.
	fn on_evict(&mut self, key: &K, value: &V);
}

/// Listener that ignores evictions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl<K, V> EvictionListener<K, V> for NoopListener {
	#[inline]
	fn on_evict(&mut self, _key: &K, _value: &V) {}
}

/// Adapts a closure into an [`EvictionListener`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FnListener<F>(pub F);

impl<K, V, F> EvictionListener<K, V> for FnListener<F>
where
	F: FnMut(&K, &V),
{
	#[inline]
	fn on_evict(&mut self, key: &K, value: &V) {
		(self.0)(key, value)
	}
}
