//! Process exit codes

/// Everything succeeded
pub const EXIT_SUCCESS: i32 = 0;

/// An operation failed
pub const EXIT_ERROR: i32 = 1;

/// Configuration or input could not be used
pub const EXIT_USAGE: i32 = 2;
