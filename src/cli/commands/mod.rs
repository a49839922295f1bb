//! CLI command implementations
//!
//! Commands return an exit code: 0 success, 1 rejected request,
//! 2 configuration error, 3 upstream failure, 5 fatal error.

pub mod init;
pub mod mask;
pub mod serve;
pub mod validate;
