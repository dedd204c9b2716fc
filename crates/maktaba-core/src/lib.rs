//! Maktaba Core: shared types, errors, and utilities.
//!
//! This crate provides the foundational types used across all Maktaba crates.
//! It has no internal Maktaba dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error taxonomy and Result alias
//! - [`content_type`]: The fixed set of publishable content kinds and their
//!   static lookup tables (collection key, default sort, query fields)
//! - [`util`]: Slug normalization helpers

pub mod content_type;
pub mod error;
pub mod util;

// Re-export key types at crate root for convenience
pub use content_type::ContentType;
pub use error::{Error, Result};

// Convenience re-exports from util
pub use util::ids::{normalize_media_type, normalize_slug};
