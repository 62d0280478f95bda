use std::hash::Hash;
use std::num::NonZeroUsize;

use crate::cache::WeightedLru;
use crate::error::ConfigError;
use crate::weigher::Weigher;

/// Cache limits in a form that can be loaded from an application's
/// configuration.
///
/// With the `serde` feature enabled this type implements `Serialize` and
/// `Deserialize`; an absent `count_limit` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheConfig {
	/// Maximum total weight. Must be non-zero.
	pub weight_limit: u64,
	/// Maximum entry count. Must be non-zero when set.
	#[cfg_attr(feature = "serde", serde(default))]
	pub count_limit: Option<usize>,
}

impl CacheConfig {
	/// Check the limits without building a cache.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.weight_limit == 0 {
			return Err(ConfigError::ZeroWeightLimit);
		}
		if self.count_limit == Some(0) {
			return Err(ConfigError::ZeroCountLimit);
		}
		Ok(())
	}
}

/// Builder for configuring a [`WeightedLru`].
///
/// # Example
///
/// ```
/// use weighted_lru::{DeepSizeWeigher, WeightedLru, WeightedLruBuilder};
///
/// let cache: WeightedLru<u64, String, _> = WeightedLruBuilder::new(64 * 1024 * 1024) // 64 MB
/// 	.count_limit(10_000)
/// 	.build(DeepSizeWeigher)?;
///
/// assert_eq!(cache.weight_limit(), 64 * 1024 * 1024);
/// # Ok::<(), weighted_lru::ConfigError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct WeightedLruBuilder {
	weight_limit: u64,
	count_limit: Option<usize>,
}

impl WeightedLruBuilder {
	/// Create a new builder with the given maximum total weight.
	pub fn new(weight_limit: u64) -> Self {
		Self {
			weight_limit,
			count_limit: None,
		}
	}

	/// Create a builder from loaded configuration.
	pub fn from_config(config: &CacheConfig) -> Self {
		Self {
			weight_limit: config.weight_limit,
			count_limit: config.count_limit,
		}
	}

	/// Set the maximum number of entries.
	///
	/// Default: unbounded
	pub fn count_limit(mut self, count: usize) -> Self {
		self.count_limit = Some(count);
		self
	}

	/// Build an empty cache with the configured limits.
	pub fn build<K, V, W>(self, weigher: W) -> Result<WeightedLru<K, V, W>, ConfigError>
	where
		K: Hash + Eq + Clone,
		W: Weigher<K, V>,
	{
		WeightedLru::with_limits(weigher, self.weight_limit, self.count()?)
	}

	/// Build a cache populated with `entries`, inserted in order.
	pub fn build_with_entries<K, V, W, I>(
		self,
		weigher: W,
		entries: I,
	) -> Result<WeightedLru<K, V, W>, ConfigError>
	where
		K: Hash + Eq + Clone,
		W: Weigher<K, V>,
		I: IntoIterator<Item = (K, V)>,
	{
		WeightedLru::with_entries(weigher, self.weight_limit, self.count()?, entries)
	}

	fn count(&self) -> Result<Option<NonZeroUsize>, ConfigError> {
		match self.count_limit {
			None => Ok(None),
			Some(count) => NonZeroUsize::new(count).map(Some).ok_or_else(|| {
				log::warn!("rejecting cache configuration with a zero count limit");
				ConfigError::ZeroCountLimit
			}),
		}
	}
}
