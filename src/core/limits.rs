/*!
 * Allocator Limits and Constants
 *
 * Defaults and thresholds shared by the allocator, the configuration layer
 * and the shell front end.
 */

// =============================================================================
// POOL GEOMETRY
// =============================================================================

/// Default total pool size (1024 units)
pub const DEFAULT_MAX_SIZE: usize = 1024;

/// Default smallest allocatable block (64 units)
/// A block is never split below this size
pub const DEFAULT_MIN_SIZE: usize = 64;

// =============================================================================
// MEMORY PRESSURE THRESHOLDS
// =============================================================================

/// Usage ratio at which pressure is reported as MEDIUM
pub const PRESSURE_MEDIUM: f64 = 0.60;

/// Usage ratio at which pressure is reported as HIGH
pub const PRESSURE_HIGH: f64 = 0.80;

/// Usage ratio at which pressure is reported as CRITICAL
pub const PRESSURE_CRITICAL: f64 = 0.95;

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Environment variable overriding the pool size
pub const ENV_MAX_SIZE: &str = "BUDDY_MAX_SIZE";

/// Environment variable overriding the minimum block size
pub const ENV_MIN_SIZE: &str = "BUDDY_MIN_SIZE";

/// Environment variable enabling JSON trace output
pub const ENV_TRACE_JSON: &str = "BUDDY_TRACE_JSON";
