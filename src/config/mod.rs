//! Configuration model for sweep.
//!
//! `Config` represents the optional `.sweep/config.yaml`. Unknown fields are
//! ignored for forward compatibility, every field has a default, and a
//! missing file means "all defaults".

mod model;
mod operations;
pub mod types;

#[cfg(test)]
mod tests;

pub use model::Config;
