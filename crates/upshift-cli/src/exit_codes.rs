//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions: 0 for success, distinct small
//! codes for the failure kinds a caller may want to branch on.

#![allow(dead_code)]

/// Success - operation completed without errors
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Usage error - invalid version or image target, rejected before any
/// cluster access
pub const USAGE_ERROR: i32 = 2;

/// No match - resolution found no eligible update target
pub const NO_MATCH_ERROR: i32 = 3;

/// Gated - an eligible target exists but the cluster state blocks it
pub const GATED_ERROR: i32 = 4;

/// Not connected - no compatible cluster version resource
pub const NOT_CONNECTED_ERROR: i32 = 5;

/// API error - cluster read or write failed
pub const API_ERROR: i32 = 6;
