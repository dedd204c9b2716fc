//! # maktaba-cli
//!
//! Command-line front end for the Maktaba search layer.
//!
//! - `maktaba search`: run a browse or search request against the index (or
//!   a saved response fixture) and print the grouped result
//! - `maktaba config`: inspect and edit the TOML configuration file

#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod config_handlers;
pub mod search_handlers;

pub use config::MaktabaConfig;
