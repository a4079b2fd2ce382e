//! Exit code constants for the sweep CLI.
//!
//! - 0: Success (individual operation failures are reported, not fatal)
//! - 1: User error (bad args, bad project root, invalid config)
//! - 2: Input failure (candidates or dependency manifest unreadable)
//! - 3: Backup failure (backup root cannot be created)
//! - 4: Rollback failure (rollback manifest missing or corrupt)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid project root, or invalid configuration.
pub const USER_ERROR: i32 = 1;

/// Input failure: candidates document or dependency manifest could not be read.
pub const INPUT_FAILURE: i32 = 2;

/// Backup failure: the backup root directory could not be prepared.
pub const BACKUP_FAILURE: i32 = 3;

/// Rollback failure: no usable rollback manifest.
pub const ROLLBACK_FAILURE: i32 = 4;
