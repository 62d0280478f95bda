use thiserror::Error;

/// Rejected cache configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
	#[error("weight limit must be greater than zero")]
	ZeroWeightLimit,

	#[error("count limit must be greater than zero")]
	ZeroCountLimit,
}
