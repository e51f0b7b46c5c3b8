/*!
 * Allocator Configuration
 *
 * Pool geometry with environment overrides. The allocator core trusts its
 * configuration, so every check on the sizes happens here before construction.
 */

use super::limits::{DEFAULT_MAX_SIZE, DEFAULT_MIN_SIZE, ENV_MAX_SIZE, ENV_MIN_SIZE};
use super::types::Size;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ConfigError {
    #[error("Pool and block sizes must be positive (max {max}, min {min})")]
    #[diagnostic(code(config::zero_size))]
    ZeroSize { max: Size, min: Size },

    #[error("Minimum block size {min} must be smaller than the pool size {max}")]
    #[diagnostic(
        code(config::min_not_below_max),
        help("Lower BUDDY_MIN_SIZE or raise BUDDY_MAX_SIZE.")
    )]
    MinNotBelowMax { max: Size, min: Size },

    #[error("Pool size {max} is not a multiple of the minimum block size {min}")]
    #[diagnostic(code(config::not_multiple))]
    NotMultiple { max: Size, min: Size },

    #[error("{0} is not a power of two")]
    #[diagnostic(
        code(config::not_power_of_two),
        help("Buddy blocks halve on every split, so both sizes must be powers of two.")
    )]
    NotPowerOfTwo(Size),

    #[error("Invalid value {value:?} for {var}")]
    #[diagnostic(code(config::invalid_value), help("Expected a positive integer."))]
    InvalidValue { var: String, value: String },
}

/// Pool geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuddyConfig {
    pub max_size: Size,
    pub min_size: Size,
}

impl Default for BuddyConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            min_size: DEFAULT_MIN_SIZE,
        }
    }
}

impl BuddyConfig {
    pub fn new(max_size: Size, min_size: Size) -> Self {
        Self { max_size, min_size }
    }

    /// Load from the process environment
    ///
    /// Environment variables:
    /// - BUDDY_MAX_SIZE: total pool size (default: 1024)
    /// - BUDDY_MIN_SIZE: smallest block size (default: 64)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load using an arbitrary variable lookup, falling back to defaults for
    /// missing keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let max_size = parse_var(&lookup, ENV_MAX_SIZE)?.unwrap_or(defaults.max_size);
        let min_size = parse_var(&lookup, ENV_MIN_SIZE)?.unwrap_or(defaults.min_size);
        let config = Self { max_size, min_size };
        config.validate()?;
        Ok(config)
    }

    /// Check the geometry the allocator relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (max, min) = (self.max_size, self.min_size);
        if max == 0 || min == 0 {
            return Err(ConfigError::ZeroSize { max, min });
        }
        if min >= max {
            return Err(ConfigError::MinNotBelowMax { max, min });
        }
        if max % min != 0 {
            return Err(ConfigError::NotMultiple { max, min });
        }
        for size in [max, min] {
            if !size.is_power_of_two() {
                return Err(ConfigError::NotPowerOfTwo(size));
            }
        }
        Ok(())
    }

    /// Number of times the root can be halved before reaching `min_size`
    pub fn max_depth(&self) -> u32 {
        (self.max_size / self.min_size).trailing_zeros()
    }
}

fn parse_var<F>(lookup: &F, var: &str) -> Result<Option<Size>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<Size>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                var: var.to_string(),
                value: raw,
            }),
    }
}
