//! Recency-ordered key/value store with an optional count limit.
//!
//! `LruStore` keeps its entries in an arena of doubly-linked nodes ordered
//! from most-recently-used (the head) to least-recently-used (the tail). A
//! hash index maps each key to its arena slot, so lookups, promotions,
//! insertions and removals are all O(1).
//!
//! # Count Limit
//!
//! When a `put` of a new key pushes the store past its capacity, the store
//! unlinks entries from the LRU end one at a time until it is back within the
//! limit. Each evicted entry is handed to the store's [`EvictionListener`]
//! before it is dropped, which lets an enclosing layer keep its own
//! bookkeeping in sync with evictions it did not request.
//!
//! # Optimizations
//!
//! - **Arena slots**: nodes live in a `Vec` and link to each other by index.
//!   Freed slots are recycled through a free list, so steady-state churn does
//!   not allocate.
//!
//! - **ahash index**: the key index is a `hashbrown` map keyed with `ahash`.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::iter::FusedIterator;
use std::num::NonZeroUsize;

use ahash::RandomState;
use hashbrown::HashMap;

use crate::listener::{EvictionListener, NoopListener};

/// Sentinel for "no slot".
const NIL: usize = usize::MAX;

struct Node<K, V> {
	key: K,
	value: V,
	/// Neighbour towards the MRU end
	prev: usize,
	/// Neighbour towards the LRU end
	next: usize,
}

/// Recency-ordered map with an optional count limit.
///
/// Keys are stored twice (once in the index, once in their node), hence the
/// `K: Clone` bound on mutating operations.
pub struct LruStore<K, V, L = NoopListener> {
	/// Key to arena slot
	index: HashMap<K, usize, RandomState>,
	/// Node arena; `None` marks a free slot
	slots: Vec<Option<Node<K, V>>>,
	/// Free slot indices available for reuse
	free: Vec<usize>,
	/// Most-recently-used slot
	head: usize,
	/// Least-recently-used slot
	tail: usize,
	/// Maximum entry count, `None` for unbounded
	cap: Option<NonZeroUsize>,
	/// Receives count-limit evictions
	listener: L,
}

impl<K, V> LruStore<K, V> {
	/// Create a store with the given count limit and no eviction listener.
	pub fn new(cap: Option<NonZeroUsize>) -> Self {
		Self::with_listener(cap, NoopListener)
	}

	/// Create a store without a count limit.
	pub fn unbounded() -> Self {
		Self::new(None)
	}
}

impl<K, V, L> LruStore<K, V, L> {
	/// Create a store with the given count limit that reports count-limit
	/// evictions to `listener`.
	pub fn with_listener(cap: Option<NonZeroUsize>, listener: L) -> Self {
		Self {
			index: HashMap::with_hasher(RandomState::new()),
			slots: Vec::new(),
			free: Vec::new(),
			head: NIL,
			tail: NIL,
			cap,
			listener,
		}
	}

	/// The configured count limit, `None` when unbounded.
	pub fn cap(&self) -> Option<NonZeroUsize> {
		self.cap
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.index.len()
	}

	/// Check if the store is empty.
	pub fn is_empty(&self) -> bool {
		self.index.is_empty()
	}

	/// Shared access to the eviction listener.
	pub fn listener(&self) -> &L {
		&self.listener
	}

	/// Exclusive access to the eviction listener.
	pub fn listener_mut(&mut self) -> &mut L {
		&mut self.listener
	}

	/// The least-recently-used entry, without changing the order.
	pub fn peek_lru(&self) -> Option<(&K, &V)> {
		self.slots.get(self.tail)?.as_ref().map(|node| (&node.key, &node.value))
	}

	/// The most-recently-used entry, without changing the order.
	pub fn peek_mru(&self) -> Option<(&K, &V)> {
		self.slots.get(self.head)?.as_ref().map(|node| (&node.key, &node.value))
	}

	/// Iterate entries from most- to least-recently-used.
	pub fn iter(&self) -> Iter<'_, K, V> {
		Iter {
			slots: &self.slots,
			front: self.head,
			back: self.tail,
			remaining: self.index.len(),
		}
	}

	/// Remove all entries. The listener is not notified.
	pub fn clear(&mut self) {
		self.index.clear();
		self.slots.clear();
		self.free.clear();
		self.head = NIL;
		self.tail = NIL;
	}

	fn node(&self, idx: usize) -> &Node<K, V> {
		match self.slots.get(idx) {
			Some(Some(node)) => node,
			_ => unreachable!("slot {idx} is not linked"),
		}
	}

	fn node_mut(&mut self, idx: usize) -> &mut Node<K, V> {
		match self.slots.get_mut(idx) {
			Some(Some(node)) => node,
			_ => unreachable!("slot {idx} is not linked"),
		}
	}

	/// Unlink a node from the recency list, leaving it in its slot.
	fn detach(&mut self, idx: usize) {
		let (prev, next) = {
			let node = self.node(idx);
			(node.prev, node.next)
		};

		if prev == NIL {
			self.head = next;
		} else {
			self.node_mut(prev).next = next;
		}

		if next == NIL {
			self.tail = prev;
		} else {
			self.node_mut(next).prev = prev;
		}
	}

	/// Link a detached node in at the MRU end.
	fn attach_front(&mut self, idx: usize) {
		let head = self.head;
		{
			let node = self.node_mut(idx);
			node.prev = NIL;
			node.next = head;
		}

		if head == NIL {
			self.tail = idx;
		} else {
			self.node_mut(head).prev = idx;
		}
		self.head = idx;
	}

	fn promote(&mut self, idx: usize) {
		if self.head != idx {
			self.detach(idx);
			self.attach_front(idx);
		}
	}

	/// Detach and free a slot, returning its node.
	fn release(&mut self, idx: usize) -> Node<K, V> {
		self.detach(idx);
		self.free.push(idx);
		match self.slots.get_mut(idx).and_then(Option::take) {
			Some(node) => node,
			None => unreachable!("slot {idx} is not linked"),
		}
	}

	fn allocate(&mut self, node: Node<K, V>) -> usize {
		match self.free.pop() {
			Some(idx) => {
				self.slots[idx] = Some(node);
				idx
			}
			None => {
				self.slots.push(Some(node));
				self.slots.len() - 1
			}
		}
	}

	fn over_capacity(&self) -> bool {
		self.cap.is_some_and(|cap| self.index.len() > cap.get())
	}
}

impl<K, V, L> LruStore<K, V, L>
where
	K: Hash + Eq,
{
	/// Check if a key is present, without changing the order.
	pub fn contains<Q>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		self.index.contains_key(key)
	}

	/// Look up a value without changing the order.
	pub fn peek<Q>(&self, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		let idx = *self.index.get(key)?;
		Some(&self.node(idx).value)
	}

	/// Look up a value and promote it to most-recently-used.
	pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		let idx = *self.index.get(key)?;
		self.promote(idx);
		Some(&self.node(idx).value)
	}

	/// Look up a value mutably and promote it to most-recently-used.
	pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		let idx = *self.index.get(key)?;
		self.promote(idx);
		Some(&mut self.node_mut(idx).value)
	}

	/// Remove an entry. The listener is not notified.
	pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		let idx = self.index.remove(key)?;
		Some(self.release(idx).value)
	}

	/// Remove the least-recently-used entry. The listener is not notified.
	pub fn pop_lru(&mut self) -> Option<(K, V)> {
		if self.tail == NIL {
			return None;
		}
		let node = self.release(self.tail);
		self.index.remove(&node.key);
		Some((node.key, node.value))
	}
}

impl<K, V, L> LruStore<K, V, L>
where
	K: Hash + Eq + Clone,
	L: EvictionListener<K, V>,
{
	/// Insert or overwrite a value and promote it to most-recently-used.
	///
	/// Returns the previous value if the key existed. Inserting a new key into
	/// a full store evicts from the LRU end, reporting each evicted entry to
	/// the listener. The entry just inserted is never evicted this way.
	pub fn put(&mut self, key: K, value: V) -> Option<V> {
		if let Some(&idx) = self.index.get(&key) {
			self.promote(idx);
			return Some(std::mem::replace(&mut self.node_mut(idx).value, value));
		}

		let idx = self.allocate(Node {
			key: key.clone(),
			value,
			prev: NIL,
			next: NIL,
		});
		self.index.insert(key, idx);
		self.attach_front(idx);

		self.evict_overflow();
		None
	}

	/// Replace the whole content with `entries`.
	///
	/// Entries are applied in order, so later duplicates overwrite earlier
	/// ones and the count limit keeps the last `cap` distinct keys. Evictions
	/// caused by the count limit are reported to the listener.
	pub fn replace_all<I>(&mut self, entries: I)
	where
		I: IntoIterator<Item = (K, V)>,
	{
		self.clear();
		for (key, value) in entries {
			self.put(key, value);
		}
	}

	fn evict_overflow(&mut self) {
		while self.over_capacity() {
			let Some((key, value)) = self.pop_lru() else {
				break;
			};
			self.listener.on_evict(&key, &value);
		}
	}
}

impl<K, V, L> fmt::Debug for LruStore<K, V, L>
where
	K: fmt::Debug,
	V: fmt::Debug,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.iter()).finish()
	}
}

impl<'a, K, V, L> IntoIterator for &'a LruStore<K, V, L> {
	type Item = (&'a K, &'a V);
	type IntoIter = Iter<'a, K, V>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

/// Iterator over entries from most- to least-recently-used.
pub struct Iter<'a, K, V> {
	slots: &'a [Option<Node<K, V>>],
	front: usize,
	back: usize,
	remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
	fn node_at(&self, idx: usize) -> Option<&'a Node<K, V>> {
		let slots = self.slots;
		slots.get(idx)?.as_ref()
	}
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
	type Item = (&'a K, &'a V);

	fn next(&mut self) -> Option<Self::Item> {
		if self.remaining == 0 {
			return None;
		}
		let node = self.node_at(self.front)?;
		self.front = node.next;
		self.remaining -= 1;
		Some((&node.key, &node.value))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.remaining, Some(self.remaining))
	}
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
	fn next_back(&mut self) -> Option<Self::Item> {
		if self.remaining == 0 {
			return None;
		}
		let node = self.node_at(self.back)?;
		self.back = node.prev;
		self.remaining -= 1;
		Some((&node.key, &node.value))
	}
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
