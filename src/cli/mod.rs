//! CLI command handlers

pub mod commands;

pub use commands::{fetch, grades, headers, load, resolve_config, LoadOptions};
