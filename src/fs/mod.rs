//! Filesystem access for sweep.
//!
//! Every destructive effect (copy, delete, rewrite) goes through the
//! [`FileSystem`] trait so the removal and rollback engines can be exercised
//! against injected faults. [`RealFs`] is the implementation used by the CLI.

pub mod atomic;
mod ops;

pub use atomic::atomic_write;
pub use ops::{FileSystem, RealFs};

#[cfg(test)]
pub(crate) use ops::test_doubles;
