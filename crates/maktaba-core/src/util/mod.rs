//! Utility modules.
//!
//! # Modules
//!
//! - [`ids`]: Slug and filter-value normalization

pub mod ids;

#[cfg(test)]
mod proptests;
