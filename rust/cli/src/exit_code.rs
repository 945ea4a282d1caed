//! Exit codes returned by [`crate::run`].

/// Command completed.
pub const SUCCESS: i32 = 0;

/// Bad arguments, bad configuration or a rejected request.
pub const ERROR: i32 = 2;

/// Input closed before an interactive game finished.
pub const INTERRUPTED: i32 = 130;
