//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// Success - operation completed without errors
pub const SUCCESS: u8 = 0;

/// General error - unspecified failure
pub const ERROR: u8 = 1;

/// Configuration error - unreadable or invalid ApplicationSet, invalid generators
pub const CONFIG_ERROR: u8 = 2;

/// Expansion error - a template could not be turned into an Application
pub const EXPANSION_ERROR: u8 = 3;

/// Render error - manifest generation for an Application failed
pub const RENDER_ERROR: u8 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: u8 = 5;

/// Usage error - invalid arguments or options (following sysexits.h convention)
pub const USAGE_ERROR: u8 = 64;
