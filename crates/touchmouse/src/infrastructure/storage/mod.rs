//! Storage infrastructure: configuration file loading.
//!
//! The `config` sub-module reads the relay's TOML file from an explicit path
//! or from the platform-appropriate directory, falls back to defaults when
//! the file does not exist yet, and validates the result before the relay
//! starts.

pub mod config;
