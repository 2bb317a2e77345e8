//! CLI command implementations
//!
//! Each command returns a process exit code: 0 success, 2 configuration
//! error, 4 connection error, 5 fatal error.

pub mod init;
pub mod serve;
pub mod status;
pub mod validate;

/// Configuration error exit code
pub const EXIT_CONFIG: i32 = 2;

/// Storage connection error exit code
pub const EXIT_CONNECTION: i32 = 4;

/// Fatal error exit code
pub const EXIT_FATAL: i32 = 5;
