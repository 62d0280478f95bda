//! # Weighted LRU
//!
//! An in-memory LRU cache bounded by the total *weight* of its entries:
//! - **Weight-bounded capacity** (bytes, serialized size, any cost you define)
//! - **Optional count limit** enforced alongside the weight limit
//! - **Pluggable weighers** (closures, unit weights, deep heap size)
//! - **O(1) recency tracking** via an arena-backed linked list
//!
//! ## Quick Start
//!
//! ```rust
//! use weighted_lru::{WeightedLru, WeightedLruBuilder};
//!
//! // Weigh entries by their serialized length, keep at most 50 bytes
//! let mut cache: WeightedLru<u32, String, _> = WeightedLruBuilder::new(50)
//!     .count_limit(100)
//!     .build(|_key: &u32, json: &String| json.len() as u64)?;
//!
//! cache.insert(1, r#"{"foo":42}"#.to_string());
//! cache.insert(2, r#"{"foo":43}"#.to_string());
//! assert_eq!(cache.weight(), 20);
//!
//! // A 44-byte document pushes the total past 50; the oldest entries go
//! cache.insert(3, r#"{"foo":42,"bar":"awesome!","hello":"world!"}"#.to_string());
//! assert_eq!(cache.weight(), 44);
//! assert_eq!(cache.len(), 1);
//! # Ok::<(), weighted_lru::ConfigError>(())
//! ```
//!
//! ## Two Limits, One Total
//!
//! The count limit is enforced by the underlying [`LruStore`], which evicts on
//! its own whenever an insert overflows it. The store reports every such
//! eviction to an [`EvictionListener`]. [`WeightedLru`] installs a listener
//! that keeps its running weight, so the total stays exact no matter which
//! limit triggered an eviction.
//!
//! ## Thread Safety
//!
//! The cache is a plain single-threaded data structure. Lookups promote
//! entries and therefore take `&mut self`; wrap the cache in a mutex to share
//! it:
//!
//! ```rust,ignore
//! use std::sync::{Arc, Mutex};
//!
//! let cache = Arc::new(Mutex::new(WeightedLru::new(DeepSizeWeigher, 1 << 20)?));
//! ```

mod builder;
mod cache;
mod error;
mod listener;
mod metrics;
mod store;
mod weigher;

pub use builder::{CacheConfig, WeightedLruBuilder};
pub use cache::WeightedLru;
pub use deepsize::DeepSizeOf;
pub use error::ConfigError;
pub use listener::{EvictionListener, FnListener, NoopListener};
pub use metrics::CacheMetrics;
pub use store::{Iter, LruStore};
pub use weigher::{DeepSizeWeigher, UnitWeigher, Weigher};
